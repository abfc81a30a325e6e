use arena_core::EngineError;
use arena_report::{InvalidBrief, InvalidPopulationConfig, SessionStatus};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session {0} not found")]
    SessionNotFound(Uuid),

    #[error("session {0} already has a run in progress")]
    RunInProgress(Uuid),

    #[error("session {0} has no report yet (status {1})")]
    ReportNotReady(Uuid, SessionStatus),

    #[error("cannot destroy session {0} while a run is in progress")]
    DestroyWhileRunning(Uuid),

    #[error("invalid brief: {0}")]
    Brief(#[from] InvalidBrief),

    #[error("invalid population config: {0}")]
    Config(#[from] InvalidPopulationConfig),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
