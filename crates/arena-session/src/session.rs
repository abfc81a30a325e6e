//! Session State
//!
//! One record per created session: the brief under test, the population
//! configuration, the lifecycle status and the outcome of the most recent
//! run. Records live inside the [`SessionStore`](crate::store::SessionStore)
//! map and are only touched under its lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use arena_report::{Brief, PopulationConfig, Report, SessionStatus};

/// Full mutable state of one session.
///
/// Status moves `Configured -> Running -> Completed | Failed`; a rerun
/// loops back through `Running`. While a run is in flight, exactly one
/// background task owns the right to write the outcome fields back.
#[derive(Debug)]
pub struct SimulationSession {
    pub id: Uuid,
    pub brief: Brief,
    pub config: PopulationConfig,
    pub status: SessionStatus,
    /// Seed the most recent run actually drew, whether requested or fresh.
    pub seed_used: Option<u64>,
    /// Stored once per run; repeated report reads return this same value.
    pub report: Option<Report>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    cancel_flag: Option<Arc<AtomicBool>>,
    run_handle: Option<JoinHandle<()>>,
}

impl SimulationSession {
    /// Fresh session around a brief, with the default population
    /// configuration until `configure` replaces it.
    pub fn new(brief: Brief) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brief,
            config: PopulationConfig::default(),
            status: SessionStatus::Configured,
            seed_used: None,
            report: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
            cancel_flag: None,
            run_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Flips into the running state and clears the previous run's outcome.
    pub fn begin_run(&mut self, cancel: Arc<AtomicBool>) {
        self.status = SessionStatus::Running;
        self.report = None;
        self.failure_reason = None;
        self.seed_used = None;
        self.cancel_flag = Some(cancel);
        self.touch();
    }

    pub fn attach_run_handle(&mut self, handle: JoinHandle<()>) {
        self.run_handle = Some(handle);
    }

    pub fn take_run_handle(&mut self) -> Option<JoinHandle<()>> {
        self.run_handle.take()
    }

    /// Records a successful run.
    pub fn complete(&mut self, report: Report, seed: u64) {
        self.status = SessionStatus::Completed;
        self.seed_used = Some(seed);
        self.report = Some(report);
        self.cancel_flag = None;
        self.touch();
    }

    /// Records a failed run. A failure report is stored so report reads
    /// return the reason instead of an error.
    pub fn fail(&mut self, reason: &str) {
        self.status = SessionStatus::Failed;
        self.failure_reason = Some(reason.to_string());
        self.report = Some(Report::failed(self.id.to_string(), reason));
        self.cancel_flag = None;
        self.touch();
    }

    /// Raises the cancellation flag for the in-flight run, if any. The
    /// engine observes it at the next round boundary. Returns whether a
    /// run was actually flagged.
    pub fn request_cancel(&self) -> bool {
        match &self.cancel_flag {
            Some(flag) => {
                flag.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
