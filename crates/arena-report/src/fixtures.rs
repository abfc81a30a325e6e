//! Sample data fixtures for testing.
//!
//! Ready-made briefs, configs and run outcomes for other crates' tests.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // arena-report = { path = "../arena-report", features = ["test-fixtures"] }
//!
//! use arena_report::fixtures;
//!
//! let brief = fixtures::sample_brief();
//! let outcome = fixtures::sample_outcome();
//! ```

use crate::{
    AgentSummary, AgentType, Brief, EdgeSnapshot, Feature, FeatureSignals, GraphSnapshot,
    Interaction, PopulationConfig, Round, SimulationOutcome, Stance, Termination, Topology,
};

/// A two-feature brief used across crate tests.
pub fn sample_brief() -> Brief {
    Brief::new(
        "Orbit Notes",
        vec![
            Feature::new(
                "Smart capture",
                "AI-assisted capture pulls notes automatically from any app",
            ),
            Feature::new(
                "Premium sync",
                "Subscription-based sync across devices at a monthly fee",
            ),
        ],
    )
}

/// Signals matching [`sample_brief`]: feature 0 reads novel, feature 1
/// reads expensive.
pub fn sample_signals() -> Vec<FeatureSignals> {
    vec![
        FeatureSignals::new(0.7, 0.2, 0.1),
        FeatureSignals::new(0.3, 0.8, 0.1),
    ]
}

/// Ten agents, {60, 20, 10, 10} mix, loose network, three rounds, seed 7.
pub fn sample_config() -> PopulationConfig {
    PopulationConfig {
        population_size: 10,
        rounds: 3,
        ..PopulationConfig::default()
    }
    .with_seed(7)
}

fn interaction(
    round: u32,
    seq: u32,
    agent: &str,
    agent_type: AgentType,
    feature: usize,
    stance: Stance,
    influence: f32,
) -> Interaction {
    let cost = match stance {
        Stance::Advocate => 10,
        Stance::Neutral => 5,
        Stance::Saboteur => 12,
    };
    Interaction::new(round, seq, agent, agent_type, feature, stance, cost, influence)
}

/// A small hand-built history: two rounds over two features with advocates,
/// a repeat saboteur on feature 1, and neutral fill.
pub fn sample_rounds() -> Vec<Round> {
    let mut round0 = Round::new(0);
    round0.interactions = vec![
        interaction(0, 0, "agent_customer_0000", AgentType::Customer, 0, Stance::Advocate, 0.45),
        interaction(0, 1, "agent_customer_0001", AgentType::Customer, 0, Stance::Neutral, 0.30),
        interaction(0, 2, "agent_competitor_0000", AgentType::Competitor, 1, Stance::Saboteur, 0.82),
        interaction(0, 3, "agent_influencer_0000", AgentType::Influencer, 0, Stance::Advocate, 0.90),
    ];

    let mut round1 = Round::new(1);
    round1.interactions = vec![
        interaction(1, 0, "agent_customer_0000", AgentType::Customer, 0, Stance::Advocate, 0.45),
        interaction(1, 1, "agent_customer_0001", AgentType::Customer, 1, Stance::Saboteur, 0.30),
        interaction(1, 2, "agent_competitor_0000", AgentType::Competitor, 1, Stance::Saboteur, 0.82),
        interaction(1, 3, "agent_internal_team_0000", AgentType::InternalTeam, 0, Stance::Advocate, 0.55),
    ];

    vec![round0, round1]
}

/// Graph over the five agents appearing in [`sample_rounds`]; the
/// influencer sways both customers, the competitor sways one.
pub fn sample_graph() -> GraphSnapshot {
    let edge = |source: &str, target: &str, weight: f32| EdgeSnapshot {
        source: source.to_string(),
        target: target.to_string(),
        weight,
    };
    GraphSnapshot {
        topology: Topology::LooseNetwork,
        node_ids: vec![
            "agent_customer_0000".to_string(),
            "agent_customer_0001".to_string(),
            "agent_competitor_0000".to_string(),
            "agent_influencer_0000".to_string(),
            "agent_internal_team_0000".to_string(),
        ],
        edges: vec![
            edge("agent_influencer_0000", "agent_customer_0000", 0.8),
            edge("agent_influencer_0000", "agent_customer_0001", 0.7),
            edge("agent_competitor_0000", "agent_customer_0001", 0.5),
            edge("agent_customer_0000", "agent_customer_0001", 0.3),
        ],
    }
}

/// Per-type aggregates matching the five fixture agents.
pub fn sample_summaries() -> Vec<AgentSummary> {
    vec![
        AgentSummary {
            agent_type: AgentType::Customer,
            count: 2,
            mean_influence: 0.375,
            mean_tokens_remaining: 81.5,
            mean_tokens_spent: 18.5,
        },
        AgentSummary {
            agent_type: AgentType::Competitor,
            count: 1,
            mean_influence: 0.82,
            mean_tokens_remaining: 126.0,
            mean_tokens_spent: 24.0,
        },
        AgentSummary {
            agent_type: AgentType::Influencer,
            count: 1,
            mean_influence: 0.90,
            mean_tokens_remaining: 110.0,
            mean_tokens_spent: 10.0,
        },
        AgentSummary {
            agent_type: AgentType::InternalTeam,
            count: 1,
            mean_influence: 0.55,
            mean_tokens_remaining: 80.0,
            mean_tokens_spent: 10.0,
        },
    ]
}

/// A complete completed-run outcome built from the fixtures above.
pub fn sample_outcome() -> SimulationOutcome {
    let rounds = sample_rounds();
    SimulationOutcome {
        seed: 7,
        topology: Topology::LooseNetwork,
        population_size: 5,
        rounds_requested: 2,
        rounds_run: 2,
        termination: Termination::AllRounds,
        rounds,
        graph: sample_graph(),
        feature_signals: sample_signals(),
        agent_summaries: sample_summaries(),
    }
}

/// An outcome for a zero-round run: no history, no engagement.
pub fn empty_outcome() -> SimulationOutcome {
    SimulationOutcome {
        seed: 7,
        topology: Topology::LooseNetwork,
        population_size: 10,
        rounds_requested: 0,
        rounds_run: 0,
        termination: Termination::AllRounds,
        rounds: Vec::new(),
        graph: GraphSnapshot {
            topology: Topology::LooseNetwork,
            node_ids: (0..10).map(|i| format!("agent_customer_{:04}", i)).collect(),
            edges: Vec::new(),
        },
        feature_signals: sample_signals(),
        agent_summaries: vec![AgentSummary {
            agent_type: AgentType::Customer,
            count: 10,
            mean_influence: 0.35,
            mean_tokens_remaining: 100.0,
            mean_tokens_spent: 0.0,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_brief_is_valid() {
        assert!(sample_brief().validate().is_ok());
        assert_eq!(sample_brief().feature_count(), 2);
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = sample_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_sample_rounds_reference_brief_features() {
        let brief = sample_brief();
        for round in sample_rounds() {
            for interaction in &round.interactions {
                assert!(brief.feature(interaction.feature_index).is_some());
            }
        }
    }

    #[test]
    fn test_sample_graph_edges_reference_nodes() {
        let graph = sample_graph();
        for edge in &graph.edges {
            assert!(graph.node_ids.contains(&edge.source));
            assert!(graph.node_ids.contains(&edge.target));
            assert_ne!(edge.source, edge.target);
        }
    }

    #[test]
    fn test_sample_outcome_counts() {
        let outcome = sample_outcome();
        assert_eq!(outcome.total_interactions(), 8);
        let counts = outcome.stance_counts();
        assert_eq!(counts.advocates, 4);
        assert_eq!(counts.saboteurs, 3);
        assert_eq!(counts.neutrals, 1);
    }

    #[test]
    fn test_empty_outcome_has_no_history() {
        let outcome = empty_outcome();
        assert_eq!(outcome.total_interactions(), 0);
        assert_eq!(outcome.rounds_run, 0);
        assert!(outcome.graph.is_isolated());
    }
}
