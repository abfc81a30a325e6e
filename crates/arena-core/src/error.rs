use arena_report::{InvalidBrief, InvalidPopulationConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid brief: {0}")]
    Brief(#[from] InvalidBrief),

    #[error("invalid population config: {0}")]
    PopulationConfig(#[from] InvalidPopulationConfig),

    #[error("invalid engine tuning: {0}")]
    Tuning(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
