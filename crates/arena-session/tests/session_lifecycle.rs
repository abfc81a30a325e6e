//! Integration tests for the full session lifecycle: create a session,
//! configure it, run it in the background, read the report, rerun,
//! cancel, destroy. Runs here are real simulations over the fixture
//! brief, kept small enough to finish instantly.

use arena_report::{
    fixtures, Interaction, PopulationConfig, SessionStatus, Topology,
};
use arena_session::{SessionError, SessionStore};

/// Two agents, one round, pinned seed. The smallest arena that still
/// commits interactions.
fn tiny_config() -> PopulationConfig {
    PopulationConfig {
        population_size: 2,
        customer_percentage: 50.0,
        competitor_percentage: 50.0,
        influencer_percentage: 0.0,
        internal_team_percentage: 0.0,
        topology: Topology::LooseNetwork,
        rounds: 1,
        seed: Some(42),
    }
}

#[tokio::test]
async fn test_session_lifecycle_happy_path() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    assert_eq!(store.status(id).await.unwrap(), SessionStatus::Configured);

    store.configure(id, fixtures::sample_config()).await.unwrap();
    store.run(id).await.unwrap();
    let status = store.await_completion(id).await.unwrap();
    assert_eq!(status, SessionStatus::Completed);

    let report = store.get_report(id).await.unwrap();
    assert_eq!(report.session_id, id.to_string());
    assert_eq!(report.status, SessionStatus::Completed);
    assert!(report.failure_reason.is_none());
    assert_eq!(report.seed, 7, "configured seed should drive the run");
    assert_eq!(report.population_size, 10);
    assert_eq!(report.rounds_run, 3);
    assert_eq!(report.rounds.len(), 3, "every requested round should be committed");
    assert!(
        (0.0..=100.0).contains(&report.adoption_score),
        "adoption score out of range: {}",
        report.adoption_score
    );
    assert!(!report.agent_summaries.is_empty());
    assert_eq!(store.seed_used(id).await.unwrap(), Some(7));
}

#[tokio::test]
async fn test_report_reads_are_stable() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    store.configure(id, fixtures::sample_config()).await.unwrap();
    store.run(id).await.unwrap();
    store.await_completion(id).await.unwrap();

    let first = store.get_report(id).await.unwrap();
    let second = store.get_report(id).await.unwrap();
    assert_eq!(
        first.to_json().unwrap(),
        second.to_json().unwrap(),
        "repeated reads must serialize identically"
    );

    // The status stays terminal on repeated queries as well.
    assert_eq!(store.status(id).await.unwrap(), SessionStatus::Completed);
    assert_eq!(
        store.await_completion(id).await.unwrap(),
        SessionStatus::Completed
    );
}

#[tokio::test]
async fn test_mutations_are_rejected_while_running() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    store.configure(id, fixtures::sample_config()).await.unwrap();
    store.run(id).await.unwrap();

    match store.run(id).await.unwrap_err() {
        SessionError::RunInProgress(rejected) => assert_eq!(rejected, id),
        other => panic!("expected RunInProgress, got {other:?}"),
    }
    assert!(matches!(
        store.configure(id, fixtures::sample_config()).await.unwrap_err(),
        SessionError::RunInProgress(_)
    ));
    assert!(matches!(
        store.rerun(id).await.unwrap_err(),
        SessionError::RunInProgress(_)
    ));
    assert!(matches!(
        store.destroy(id).await.unwrap_err(),
        SessionError::DestroyWhileRunning(_)
    ));

    assert_eq!(
        store.await_completion(id).await.unwrap(),
        SessionStatus::Completed
    );
}

#[tokio::test]
async fn test_cancel_lands_on_failed_with_reason() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    store.configure(id, fixtures::sample_config()).await.unwrap();
    store.run(id).await.unwrap();

    assert!(store.cancel(id).await.unwrap(), "an in-flight run should be flagged");
    let status = store.await_completion(id).await.unwrap();
    assert_eq!(status, SessionStatus::Failed);

    let report = store.get_report(id).await.unwrap();
    assert!(report.is_failure());
    assert_eq!(report.failure_reason.as_deref(), Some("cancelled"));
    assert_eq!(report.session_id, id.to_string());
    assert_eq!(report.adoption_score, 0.0);
    assert!(report.rounds.is_empty());
}

#[tokio::test]
async fn test_rerun_draws_a_fresh_population() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    store
        .configure(id, fixtures::sample_config().with_seed(42))
        .await
        .unwrap();

    store.run(id).await.unwrap();
    store.await_completion(id).await.unwrap();
    let first = store.get_report(id).await.unwrap();
    assert_eq!(first.seed, 42);

    store.rerun(id).await.unwrap();
    assert_eq!(
        store.await_completion(id).await.unwrap(),
        SessionStatus::Completed
    );
    let second = store.get_report(id).await.unwrap();
    assert_ne!(second.seed, 42, "rerun should draw a fresh seed");
    assert_eq!(second.population_size, first.population_size);
    assert!((0.0..=100.0).contains(&second.adoption_score));
}

#[tokio::test]
async fn test_destroy_after_completion() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    store.configure(id, tiny_config()).await.unwrap();
    store.run(id).await.unwrap();
    store.await_completion(id).await.unwrap();

    store.destroy(id).await.unwrap();
    assert_eq!(store.session_count().await, 0);
    assert!(matches!(
        store.get_report(id).await.unwrap_err(),
        SessionError::SessionNotFound(_)
    ));
}

#[tokio::test]
async fn test_zero_round_session_reports_the_baseline() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    let config = PopulationConfig {
        population_size: 10,
        rounds: 0,
        seed: Some(5),
        ..PopulationConfig::default()
    };
    store.configure(id, config).await.unwrap();
    store.run(id).await.unwrap();
    assert_eq!(
        store.await_completion(id).await.unwrap(),
        SessionStatus::Completed
    );

    let report = store.get_report(id).await.unwrap();
    assert_eq!(report.adoption_score, 50.0, "no history lands on the neutral baseline");
    assert_eq!(report.arena_health.polarization_score, 0.0);
    assert_eq!(report.arena_health.advocate_to_saboteur_ratio, 0.0);
    assert_eq!(report.arena_health.engagement_density, 0.0);
    assert_eq!(report.rounds_run, 0);
    assert!(report.rounds.is_empty());
    assert!(report.top_objections.is_empty());
    assert!(report.must_fix.is_empty());
    assert_eq!(report.quick_insights.len(), 1);
}

#[tokio::test]
async fn test_two_agent_arena_stays_in_bounds() {
    let store = SessionStore::new();
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    store.configure(id, tiny_config()).await.unwrap();
    store.run(id).await.unwrap();
    assert_eq!(
        store.await_completion(id).await.unwrap(),
        SessionStatus::Completed
    );

    let report = store.get_report(id).await.unwrap();
    assert_eq!(report.population_size, 2);
    assert_eq!(report.rounds_run, 1);
    assert!(
        report.total_interactions() <= 2,
        "two agents can commit at most one interaction each"
    );
    let feature_count = fixtures::sample_brief().feature_count();
    for round in &report.rounds {
        for interaction in &round.interactions {
            assert!(interaction.feature_index < feature_count);
            assert!(interaction.token_cost > 0);
        }
    }
}

#[tokio::test]
async fn test_interaction_log_matches_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new().with_log_dir(dir.path());
    let id = store.create_session(fixtures::sample_brief()).await.unwrap();
    store.configure(id, fixtures::sample_config()).await.unwrap();
    store.run(id).await.unwrap();
    assert_eq!(
        store.await_completion(id).await.unwrap(),
        SessionStatus::Completed
    );

    let report = store.get_report(id).await.unwrap();
    let log_path = dir.path().join(format!("interactions_{}.jsonl", id));
    let contents = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines.len(),
        report.total_interactions(),
        "log should hold one line per committed interaction"
    );
    let feature_count = fixtures::sample_brief().feature_count();
    for line in lines {
        let interaction: Interaction = serde_json::from_str(line).unwrap();
        assert!(interaction.feature_index < feature_count);
    }
}

#[tokio::test]
async fn test_analyze_ad_hoc_is_ephemeral() {
    let store = SessionStore::new();
    let report = store
        .analyze_ad_hoc(
            "Orbit Notes captures meetings. Offline sync works everywhere. \
             Search answers plain questions.",
        )
        .await
        .unwrap();

    assert_eq!(report.session_id, "ad-hoc");
    assert_eq!(report.status, SessionStatus::Completed);
    assert_eq!(report.population_size, 12);
    assert_eq!(report.rounds_run, 2);
    assert!((0.0..=100.0).contains(&report.adoption_score));
    assert_eq!(store.session_count().await, 0, "ad-hoc runs must not be stored");
}
