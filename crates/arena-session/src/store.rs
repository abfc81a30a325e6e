//! Session Store
//!
//! The process-wide session registry: one [`SimulationSession`] per id
//! behind an async lock. Simulation runs execute on the blocking pool
//! with the lock released; single-writer per session is enforced through
//! the status field, which flips to `Running` before the lock is dropped.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use arena_analyst::Analyst;
use arena_core::{EngineConfig, EngineError, InteractionLogger, Simulation};
use arena_report::{Brief, PopulationConfig, Report, SessionStatus, SimulationOutcome};

use crate::adhoc;
use crate::error::{Result, SessionError};
use crate::session::SimulationSession;

/// Keyed session registry with an explicit lifecycle: create, configure,
/// run, read the report, rerun, destroy. Cloning the store shares the
/// underlying map.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SimulationSession>>>,
    engine_config: EngineConfig,
    analyst: Analyst,
    log_dir: Option<PathBuf>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            engine_config: EngineConfig::default(),
            analyst: Analyst::with_defaults(),
            log_dir: None,
        }
    }

    /// Replaces the engine tuning used by every subsequent run.
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    /// Replaces the analyst that turns outcomes into reports.
    pub fn with_analyst(mut self, analyst: Analyst) -> Self {
        self.analyst = analyst;
        self
    }

    /// Writes each run's interaction history under this directory as
    /// `interactions_<session_id>.jsonl`.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Creates a session around a brief. The brief is validated up front;
    /// an invalid brief never creates a session.
    pub async fn create_session(&self, brief: Brief) -> Result<Uuid> {
        brief.validate()?;
        let session = SimulationSession::new(brief);
        let id = session.id;
        self.sessions.write().await.insert(id, session);
        info!(session = %id, "session created");
        Ok(id)
    }

    /// Replaces a session's population configuration. Rejected while a
    /// run is in flight; the stored report is untouched until the next run.
    pub async fn configure(&self, session_id: Uuid, config: PopulationConfig) -> Result<()> {
        config.validate()?;
        let mut sessions = self.sessions.write().await;
        let session = Self::get_mut(&mut sessions, session_id)?;
        if session.is_running() {
            return Err(SessionError::RunInProgress(session_id));
        }
        session.config = config;
        Ok(())
    }

    /// Starts a run on the blocking pool and returns once it is admitted.
    /// Completion is observed through [`status`](Self::status) or
    /// [`await_completion`](Self::await_completion). A second run on the
    /// same session is rejected until the first finishes.
    pub async fn run(&self, session_id: Uuid) -> Result<()> {
        let cancel = Arc::new(AtomicBool::new(false));
        let (brief, config) = {
            let mut sessions = self.sessions.write().await;
            let session = Self::get_mut(&mut sessions, session_id)?;
            if session.is_running() {
                return Err(SessionError::RunInProgress(session_id));
            }
            session.brief.validate()?;
            session.config.validate()?;
            session.begin_run(Arc::clone(&cancel));
            (session.brief.clone(), session.config.clone())
        };

        let sessions = Arc::clone(&self.sessions);
        let engine_config = self.engine_config.clone();
        let analyst = self.analyst.clone();
        let log_path = self
            .log_dir
            .as_ref()
            .map(|dir| dir.join(format!("interactions_{}.jsonl", session_id)));

        let handle = tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                let simulation = Simulation::prepare(&brief, &config, &engine_config)?;
                let simulation = match &log_path {
                    Some(path) => simulation.with_logger(InteractionLogger::new(path)?),
                    None => simulation,
                };
                Ok::<SimulationOutcome, EngineError>(simulation.run(&cancel))
            })
            .await;

            let mut sessions = sessions.write().await;
            let Some(session) = sessions.get_mut(&session_id) else {
                warn!(session = %session_id, "session vanished while its run was in flight");
                return;
            };
            match result {
                Ok(Ok(outcome)) if outcome.was_cancelled() => {
                    info!(session = %session_id, rounds_run = outcome.rounds_run, "run cancelled");
                    session.fail("cancelled");
                }
                Ok(Ok(outcome)) => {
                    let report =
                        analyst.build_report(&session_id.to_string(), &session.brief, &outcome);
                    info!(session = %session_id, seed = outcome.seed, "run completed");
                    session.complete(report, outcome.seed);
                }
                Ok(Err(e)) => {
                    warn!(session = %session_id, error = %e, "run failed");
                    session.fail(&e.to_string());
                }
                Err(e) => {
                    warn!(session = %session_id, error = %e, "run task aborted");
                    session.fail(&format!("run task failed: {}", e));
                }
            }
        });

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&session_id) {
            session.attach_run_handle(handle);
        }
        Ok(())
    }

    /// Waits for the in-flight run, if any, and returns the status the
    /// session landed on.
    pub async fn await_completion(&self, session_id: Uuid) -> Result<SessionStatus> {
        let handle = {
            let mut sessions = self.sessions.write().await;
            let session = Self::get_mut(&mut sessions, session_id)?;
            session.take_run_handle()
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(session = %session_id, error = %e, "run task join failed");
            }
        }
        self.status(session_id).await
    }

    /// Returns the stored report. Completed and failed runs both store a
    /// report; until then this reports the current status instead.
    pub async fn get_report(&self, session_id: Uuid) -> Result<Report> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;
        match &session.report {
            Some(report) => Ok(report.clone()),
            None => Err(SessionError::ReportNotReady(session_id, session.status)),
        }
    }

    /// Starts a fresh run: same brief and configuration, but a fresh seed
    /// and therefore a fresh population sample.
    pub async fn rerun(&self, session_id: Uuid) -> Result<()> {
        {
            let mut sessions = self.sessions.write().await;
            let session = Self::get_mut(&mut sessions, session_id)?;
            if session.is_running() {
                return Err(SessionError::RunInProgress(session_id));
            }
            session.config.seed = None;
        }
        self.run(session_id).await
    }

    /// Requests cooperative cancellation of the in-flight run. The engine
    /// notices at the next round boundary and the session lands on
    /// `Failed` with reason `"cancelled"`. Returns whether a run was
    /// actually flagged; cancelling an idle session is a no-op.
    pub async fn cancel(&self, session_id: Uuid) -> Result<bool> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;
        Ok(session.request_cancel())
    }

    /// Removes a session and its stored report. Rejected while a run is
    /// in flight.
    pub async fn destroy(&self, session_id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))?;
        if session.is_running() {
            return Err(SessionError::DestroyWhileRunning(session_id));
        }
        sessions.remove(&session_id);
        info!(session = %session_id, "session destroyed");
        Ok(())
    }

    pub async fn status(&self, session_id: Uuid) -> Result<SessionStatus> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .map(|session| session.status)
            .ok_or(SessionError::SessionNotFound(session_id))
    }

    /// Seed the session's most recent run actually used, once it has one.
    pub async fn seed_used(&self, session_id: Uuid) -> Result<Option<u64>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .map(|session| session.seed_used)
            .ok_or(SessionError::SessionNotFound(session_id))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Single-shot analysis of free text: slices the text into a pseudo
    /// brief, runs a small ephemeral arena and returns the report without
    /// storing anything.
    pub async fn analyze_ad_hoc(&self, text: &str) -> Result<Report> {
        let brief = adhoc::brief_from_text(text);
        brief.validate()?;
        let config = adhoc::ad_hoc_config();

        let engine_config = self.engine_config.clone();
        let run_brief = brief.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let simulation = Simulation::prepare(&run_brief, &config, &engine_config)?;
            Ok::<SimulationOutcome, EngineError>(simulation.run(&AtomicBool::new(false)))
        })
        .await??;

        info!(
            seed = outcome.seed,
            interactions = outcome.total_interactions(),
            "ad-hoc analysis finished"
        );
        Ok(self.analyst.build_report("ad-hoc", &brief, &outcome))
    }

    fn get_mut(
        sessions: &mut HashMap<Uuid, SimulationSession>,
        session_id: Uuid,
    ) -> Result<&mut SimulationSession> {
        sessions
            .get_mut(&session_id)
            .ok_or(SessionError::SessionNotFound(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_report::fixtures;
    use arena_report::Feature;

    #[tokio::test]
    async fn test_create_session_starts_configured() {
        let store = SessionStore::new();
        let id = store.create_session(fixtures::sample_brief()).await.unwrap();

        assert_eq!(store.status(id).await.unwrap(), SessionStatus::Configured);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_session_rejects_invalid_brief() {
        let store = SessionStore::new();
        let brief = Brief::new("Orbit Notes", Vec::new());

        let err = store.create_session(brief).await.unwrap_err();
        assert!(matches!(err, SessionError::Brief(_)));
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_configure_rejects_invalid_population() {
        let store = SessionStore::new();
        let id = store.create_session(fixtures::sample_brief()).await.unwrap();

        let config = PopulationConfig {
            population_size: 0,
            ..PopulationConfig::default()
        };
        let err = store.configure(id, config).await.unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[tokio::test]
    async fn test_unknown_session_is_reported_by_id() {
        let store = SessionStore::new();
        let missing = Uuid::new_v4();

        let err = store.status(missing).await.unwrap_err();
        match err {
            SessionError::SessionNotFound(id) => assert_eq!(id, missing),
            other => panic!("expected SessionNotFound, got {other:?}"),
        }
        assert!(matches!(
            store.run(missing).await.unwrap_err(),
            SessionError::SessionNotFound(_)
        ));
        assert!(matches!(
            store.destroy(missing).await.unwrap_err(),
            SessionError::SessionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_get_report_before_any_run() {
        let store = SessionStore::new();
        let id = store.create_session(fixtures::sample_brief()).await.unwrap();

        let err = store.get_report(id).await.unwrap_err();
        match err {
            SessionError::ReportNotReady(_, status) => {
                assert_eq!(status, SessionStatus::Configured)
            }
            other => panic!("expected ReportNotReady, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_destroy_removes_the_session() {
        let store = SessionStore::new();
        let id = store.create_session(fixtures::sample_brief()).await.unwrap();

        store.destroy(id).await.unwrap();
        assert_eq!(store.session_count().await, 0);
        assert!(matches!(
            store.status(id).await.unwrap_err(),
            SessionError::SessionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_cancel_without_a_run_is_a_no_op() {
        let store = SessionStore::new();
        let id = store.create_session(fixtures::sample_brief()).await.unwrap();

        assert!(!store.cancel(id).await.unwrap());
        assert_eq!(store.status(id).await.unwrap(), SessionStatus::Configured);
    }

    #[tokio::test]
    async fn test_ad_hoc_brief_must_have_substance() {
        let store = SessionStore::new();
        let err = store.analyze_ad_hoc("   ").await.unwrap_err();
        assert!(matches!(err, SessionError::Brief(_)));
    }

    #[tokio::test]
    async fn test_default_config_runs_to_completion() {
        let store = SessionStore::new();
        let brief = Brief::new("Orbit Notes", vec![Feature::new("Smart capture", "ok")]);
        let id = store.create_session(brief).await.unwrap();

        store.run(id).await.unwrap();
        assert_eq!(
            store.await_completion(id).await.unwrap(),
            SessionStatus::Completed
        );
        assert!(store.seed_used(id).await.unwrap().is_some());
    }
}
