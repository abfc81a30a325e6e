//! Externally Visible Report Types
//!
//! The `Report` is the one JSON-shaped structure dashboards, extensions and
//! webhooks consume. Field names and nesting are a stable contract; they are
//! depended on verbatim downstream. Every collection here is an ordered
//! `Vec` so a stored report serializes byte-identically on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interaction::Round;
use crate::outcome::AgentSummary;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Configured,
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Completed and failed sessions never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Configured => "configured",
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// Aggregate market-sentiment metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaHealth {
    /// Stance bimodality in [0, 1]; even advocate/saboteur split reads high.
    pub polarization_score: f32,
    /// Advocates per saboteur; capped sentinel when saboteurs are absent.
    pub advocate_to_saboteur_ratio: f32,
    /// Mean graph distance from sources to later same-feature actors.
    pub viral_path_length: f32,
    /// Interactions per agent per round actually run.
    pub engagement_density: f32,
}

impl ArenaHealth {
    /// All-zero metrics, used by failure reports and empty histories.
    pub fn zeroed() -> Self {
        Self {
            polarization_score: 0.0,
            advocate_to_saboteur_ratio: 0.0,
            viral_path_length: 0.0,
            engagement_density: 0.0,
        }
    }
}

impl Default for ArenaHealth {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// A ranked objection raised by saboteur interactions against one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objection {
    pub feature_title: String,
    pub message: String,
    /// Saboteur interactions behind this objection.
    pub frequency: u32,
    /// Highest influence score among the objecting agents.
    pub peak_influence: f32,
    /// Distinct rounds in which the objection appeared.
    pub rounds_seen: u32,
}

/// The externally visible result of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Overall predicted acceptance in [0, 100].
    pub adoption_score: f32,
    pub quick_insights: Vec<String>,
    pub top_objections: Vec<Objection>,
    pub must_fix: Vec<Objection>,
    pub arena_health: ArenaHealth,
    pub agent_summaries: Vec<AgentSummary>,
    pub population_size: u32,
    pub rounds_run: u32,
    /// Seed the run actually used; replaying with it reproduces the history.
    pub seed: u64,
    /// Full interaction history in round order.
    pub rounds: Vec<Round>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Builds the explicit failure report surfaced through `get_report` when
    /// a run never produced an outcome. Metrics are zeroed, lists empty.
    pub fn failed(session_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            status: SessionStatus::Failed,
            failure_reason: Some(reason.into()),
            adoption_score: 0.0,
            quick_insights: Vec::new(),
            top_objections: Vec::new(),
            must_fix: Vec::new(),
            arena_health: ArenaHealth::zeroed(),
            agent_summaries: Vec::new(),
            population_size: 0,
            rounds_run: 0,
            seed: 0,
            rounds: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == SessionStatus::Failed
    }

    pub fn total_interactions(&self) -> usize {
        self.rounds.iter().map(|r| r.interaction_count()).sum()
    }

    /// Serializes to the JSON consumed by integrations.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!SessionStatus::Configured.is_terminal());
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Running).unwrap(),
            r#""running""#
        );
    }

    #[test]
    fn test_failure_report_shape() {
        let report = Report::failed("a1b2", "graph build failure");
        assert!(report.is_failure());
        assert_eq!(report.failure_reason.as_deref(), Some("graph build failure"));
        assert_eq!(report.adoption_score, 0.0);
        assert!(report.rounds.is_empty());
        assert_eq!(report.arena_health, ArenaHealth::zeroed());
    }

    #[test]
    fn test_report_json_stability() {
        let mut report = Report::failed("a1b2", "cancelled");
        report.generated_at = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let first = report.to_json().unwrap();
        let second = report.to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.contains(r#""status":"failed""#));
        assert!(first.contains(r#""failure_reason":"cancelled""#));
    }

    #[test]
    fn test_failure_reason_omitted_when_absent() {
        let report = Report {
            failure_reason: None,
            status: SessionStatus::Completed,
            ..Report::failed("a1b2", "placeholder")
        };
        let json = report.to_json().unwrap();
        assert!(!json.contains("failure_reason"));
    }
}
