//! Engine Outcome Types
//!
//! The complete result of one engine run, handed to the analyst. Everything
//! the analyst needs lives here so it never has to reach back into engine
//! state: the full round history, the graph shape, the feature signal table,
//! and per-type population aggregates.

use serde::{Deserialize, Serialize};

use crate::brief::FeatureSignals;
use crate::interaction::{Round, StanceCounts};
use crate::population::{AgentType, Topology};

/// One directed edge in the influence graph; `source` sways `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: String,
    pub target: String,
    pub weight: f32,
}

/// Exported influence graph shape.
///
/// Node ids appear in arena order, the same order agents were generated in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub topology: Topology,
    pub node_ids: Vec<String>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when no edges exist, the degenerate but valid state for
    /// populations of fewer than two agents.
    pub fn is_isolated(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Per-type population aggregate at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub agent_type: AgentType,
    pub count: u32,
    pub mean_influence: f32,
    pub mean_tokens_remaining: f32,
    pub mean_tokens_spent: f32,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The configured round count completed.
    AllRounds,
    /// Every agent dropped below the cheapest action cost.
    TokensExhausted,
    /// A cooperative cancellation was observed at a round boundary.
    Cancelled,
}

/// Complete result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Seed actually used, recorded even when the caller provided none.
    pub seed: u64,
    pub topology: Topology,
    pub population_size: u32,
    /// Rounds requested by configuration.
    pub rounds_requested: u32,
    /// Rounds actually run; lower than requested on early termination.
    pub rounds_run: u32,
    pub termination: Termination,
    pub rounds: Vec<Round>,
    pub graph: GraphSnapshot,
    /// Signal table in brief feature order.
    pub feature_signals: Vec<FeatureSignals>,
    /// Per-type aggregates in [`AgentType::all`] order, absent types skipped.
    pub agent_summaries: Vec<AgentSummary>,
}

impl SimulationOutcome {
    pub fn total_interactions(&self) -> usize {
        self.rounds.iter().map(|r| r.interaction_count()).sum()
    }

    /// Stance tally over the whole history.
    pub fn stance_counts(&self) -> StanceCounts {
        let mut counts = StanceCounts::default();
        for round in &self.rounds {
            counts.absorb(round.stance_counts());
        }
        counts
    }

    pub fn was_cancelled(&self) -> bool {
        self.termination == Termination::Cancelled
    }
}
