//! Integration tests for the analyst pipeline.
//!
//! These tests run the full report assembly against the shared fixtures to
//! verify the report contract end-to-end.

use arena_analyst::{Analyst, AnalystConfig, InsightConfig, ObjectionConfig};
use arena_report::fixtures::{empty_outcome, sample_brief, sample_outcome};
use arena_report::{ArenaHealth, SessionStatus};

/// Test the full pipeline with the shared sample run.
#[test]
fn test_full_report_pipeline() {
    let analyst = Analyst::with_defaults();
    let report = analyst.build_report("session-42", &sample_brief(), &sample_outcome());

    assert_eq!(report.status, SessionStatus::Completed);
    assert!(
        report.adoption_score > 0.0 && report.adoption_score < 100.0,
        "Expected a mid-range adoption score, got {}",
        report.adoption_score
    );

    // every health metric has signal in this history
    assert!(report.arena_health.polarization_score > 0.0);
    assert!(report.arena_health.advocate_to_saboteur_ratio > 1.0);
    assert!(report.arena_health.engagement_density > 0.0);
    assert!(report.arena_health.viral_path_length > 0.0);

    // the repeat saboteur on the priced feature surfaces as the objection
    assert_eq!(report.top_objections.len(), 1);
    let objection = &report.top_objections[0];
    assert_eq!(objection.feature_title, "Premium sync");
    assert_eq!(objection.frequency, 3);
    assert_eq!(objection.rounds_seen, 2);
    assert!(
        objection.message.contains("pricing"),
        "Expected a pricing-angle message, got: {}",
        objection.message
    );
    assert_eq!(report.must_fix.len(), 1);

    assert!(
        report.quick_insights[0].contains("Advocates outnumbered saboteurs"),
        "Expected the sentiment line first, got: {}",
        report.quick_insights[0]
    );

    // the full history rides along for replay and drill-down
    assert_eq!(report.rounds.len(), 2);
    assert_eq!(report.seed, 7);
}

/// Test that a run with no interactions lands on the score baseline.
#[test]
fn test_empty_run_lands_on_baseline() {
    let report =
        Analyst::with_defaults().build_report("session-42", &sample_brief(), &empty_outcome());

    assert_eq!(report.adoption_score, 50.0);
    assert_eq!(report.arena_health, ArenaHealth::zeroed());
    assert!(report.top_objections.is_empty());
    assert!(report.must_fix.is_empty());
    assert_eq!(report.quick_insights.len(), 1);
    assert!(report.quick_insights[0].contains("no reaction"));
}

/// Test that the serialized report is stable and keeps its field names.
#[test]
fn test_report_json_contract() {
    let report =
        Analyst::with_defaults().build_report("session-42", &sample_brief(), &sample_outcome());

    let first = report.to_json().expect("report should serialize");
    let second = report.to_json().expect("report should serialize");
    assert_eq!(first, second, "same report must serialize identically");

    for field in [
        r#""session_id""#,
        r#""status""#,
        r#""adoption_score""#,
        r#""quick_insights""#,
        r#""top_objections""#,
        r#""must_fix""#,
        r#""arena_health""#,
        r#""agent_summaries""#,
        r#""rounds""#,
        r#""seed""#,
        r#""generated_at""#,
    ] {
        assert!(first.contains(field), "missing field {} in report JSON", field);
    }
    // a completed report carries no failure_reason key at all
    assert!(!first.contains("failure_reason"));
}

/// Test that tightened thresholds empty the objection lists.
#[test]
fn test_tightened_thresholds_filter_lists() {
    let config = AnalystConfig {
        objections: ObjectionConfig {
            max_objections: 0,
            must_fix_influence: 0.9,
            must_fix_rounds: 5,
        },
        ..AnalystConfig::default()
    };
    let report = Analyst::new(config).build_report("session-42", &sample_brief(), &sample_outcome());

    assert!(report.top_objections.is_empty());
    // peak influence 0.82 and two rounds clear neither raised bar
    assert!(report.must_fix.is_empty());
}

/// Test that one analyst serves several sessions without carryover.
#[test]
fn test_analyst_is_stateless_across_sessions() {
    let analyst = Analyst::new(AnalystConfig {
        insights: InsightConfig { max_insights: 2 },
        ..AnalystConfig::default()
    });

    let busy = analyst.build_report("session-a", &sample_brief(), &sample_outcome());
    let quiet = analyst.build_report("session-b", &sample_brief(), &empty_outcome());
    let busy_again = analyst.build_report("session-c", &sample_brief(), &sample_outcome());

    assert_eq!(busy.quick_insights.len(), 2);
    assert_eq!(quiet.quick_insights.len(), 1);
    assert_eq!(busy.adoption_score, busy_again.adoption_score);
    assert_eq!(busy.top_objections, busy_again.top_objections);
}
