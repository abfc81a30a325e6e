//! Report Assembly
//!
//! Turns a finished engine run into the externally visible [`Report`]:
//! arena health metrics, the adoption score, ranked objections and a
//! handful of quick insights. The analyst never mutates engine state; it
//! reads one [`SimulationOutcome`] and produces one report.

pub mod config;
pub mod insights;
pub mod metrics;
pub mod objections;

// Re-export config types
pub use config::{
    default_config_toml, AdoptionWeights, AnalystConfig, ConfigError, InsightConfig,
    MetricsConfig, ObjectionConfig, TomlSerializeError,
};

// Re-export the metric and report-section builders
pub use insights::quick_insights;
pub use metrics::{adoption_score, compute_health};
pub use objections::{collect_objections, must_fix, top_objections};

use std::fmt;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use arena_report::{Brief, Report, SessionStatus, SimulationOutcome};

/// Errors that can occur in analyst operations.
#[derive(Debug)]
pub enum AnalystError {
    /// Error loading configuration
    Config(ConfigError),
}

impl fmt::Display for AnalystError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalystError::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for AnalystError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalystError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AnalystError {
    fn from(e: ConfigError) -> Self {
        AnalystError::Config(e)
    }
}

/// The report builder. Owns the tuning knobs; stateless between runs, so
/// one analyst can serve any number of sessions.
#[derive(Debug, Clone)]
pub struct Analyst {
    config: AnalystConfig,
}

impl Analyst {
    /// Creates an analyst with the given configuration.
    pub fn new(config: AnalystConfig) -> Self {
        Self { config }
    }

    /// Creates an analyst from a configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self, AnalystError> {
        let config = AnalystConfig::from_file(path)?;
        Ok(Self::new(config))
    }

    /// Creates an analyst with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AnalystConfig::default())
    }

    pub fn config(&self) -> &AnalystConfig {
        &self.config
    }

    /// Builds the complete report for one finished run.
    ///
    /// This is the main entry point for the analyst. It:
    /// 1. Aggregates arena health over the full history
    /// 2. Folds health into the adoption score
    /// 3. Ranks objections, then slices the public and must-fix lists
    /// 4. Phrases the quick insights
    /// 5. Assembles the report
    pub fn build_report(
        &self,
        session_id: &str,
        brief: &Brief,
        outcome: &SimulationOutcome,
    ) -> Report {
        // 1. Aggregate arena health over the full history
        let arena_health = compute_health(outcome, &self.config.metrics);

        // 2. Fold health into the adoption score
        let adoption = adoption_score(outcome, &arena_health, &self.config.adoption);

        // 3. Rank objections, then slice the public and must-fix lists
        let ranked = collect_objections(brief, outcome);
        let top_objections = top_objections(&ranked, &self.config.objections);
        let must_fix = must_fix(&ranked, &self.config.objections);

        // 4. Phrase the quick insights
        let quick_insights = quick_insights(brief, outcome, &arena_health, &self.config.insights);

        info!(
            session_id,
            adoption_score = adoption,
            objections = ranked.len(),
            rounds_run = outcome.rounds_run,
            "report assembled"
        );

        // 5. Assemble the report
        Report {
            session_id: session_id.to_string(),
            status: SessionStatus::Completed,
            failure_reason: None,
            adoption_score: adoption,
            quick_insights,
            top_objections,
            must_fix,
            arena_health,
            agent_summaries: outcome.agent_summaries.clone(),
            population_size: outcome.population_size,
            rounds_run: outcome.rounds_run,
            seed: outcome.seed,
            rounds: outcome.rounds.clone(),
            generated_at: Utc::now(),
        }
    }
}

impl Default for Analyst {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_report::fixtures::{empty_outcome, sample_brief, sample_outcome};
    use std::io::Write;

    #[test]
    fn test_report_carries_run_identity() {
        let analyst = Analyst::with_defaults();
        let report = analyst.build_report("session-1", &sample_brief(), &sample_outcome());

        assert_eq!(report.session_id, "session-1");
        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(report.failure_reason, None);
        assert_eq!(report.seed, 7);
        assert_eq!(report.population_size, 5);
        assert_eq!(report.rounds_run, 2);
        assert_eq!(report.rounds, sample_outcome().rounds);
        assert_eq!(report.agent_summaries, sample_outcome().agent_summaries);
    }

    #[test]
    fn test_fixture_report_scores() {
        let report =
            Analyst::with_defaults().build_report("session-1", &sample_brief(), &sample_outcome());

        // 0.5 + 0.35 * 0.5 + 0.25 * 0.8 - 0.30 * 0.75 = 0.65
        assert!((report.adoption_score - 65.0).abs() < 0.01);
        assert!((report.arena_health.polarization_score - 0.75).abs() < 1e-6);
        assert!((report.arena_health.engagement_density - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_fixture_report_objections() {
        let report =
            Analyst::with_defaults().build_report("session-1", &sample_brief(), &sample_outcome());

        assert_eq!(report.top_objections.len(), 1);
        assert_eq!(report.top_objections[0].feature_title, "Premium sync");
        assert_eq!(report.must_fix.len(), 1);
    }

    #[test]
    fn test_fixture_report_insights_capped() {
        let report =
            Analyst::with_defaults().build_report("session-1", &sample_brief(), &sample_outcome());
        assert_eq!(report.quick_insights.len(), 4);

        let config = AnalystConfig {
            insights: InsightConfig { max_insights: 1 },
            ..AnalystConfig::default()
        };
        let short = Analyst::new(config).build_report("session-1", &sample_brief(), &sample_outcome());
        assert_eq!(short.quick_insights.len(), 1);
    }

    #[test]
    fn test_empty_history_lands_on_baseline() {
        let report =
            Analyst::with_defaults().build_report("session-1", &sample_brief(), &empty_outcome());

        assert_eq!(report.adoption_score, 50.0);
        assert!(report.top_objections.is_empty());
        assert!(report.must_fix.is_empty());
        assert_eq!(report.arena_health, arena_report::ArenaHealth::zeroed());
        assert_eq!(report.quick_insights.len(), 1);
    }

    #[test]
    fn test_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[objections]\nmax_objections = 2\nmust_fix_influence = 0.9\nmust_fix_rounds = 3\n"
        )
        .unwrap();

        let analyst = Analyst::from_config_file(file.path()).unwrap();
        assert_eq!(analyst.config().objections.max_objections, 2);
        // untouched sections keep their defaults
        assert_eq!(analyst.config().insights.max_insights, 4);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let err = Analyst::from_config_file(Path::new("/nonexistent/analyst.toml")).unwrap_err();
        assert!(matches!(err, AnalystError::Config(ConfigError::IoError(_))));
        assert!(err.to_string().contains("config error"));
    }
}
