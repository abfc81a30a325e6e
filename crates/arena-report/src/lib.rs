//! Shared data types for the market arena simulation.
//!
//! This crate contains pure data structures with no engine logic.
//! It is a dependency for all other crates in the workspace. The types in
//! [`report`] form the stable JSON contract consumed by dashboards and
//! integrations; the rest are the vocabulary the engine and analyst share.

pub mod brief;
pub mod interaction;
pub mod outcome;
pub mod population;
pub mod report;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export brief types
pub use brief::{Brief, Feature, FeatureSignals, InvalidBrief};

// Re-export population types
pub use population::{
    AgentType, InvalidPopulationConfig, ParseTopologyError, PersonalityTrait, PopulationConfig,
    Topology,
};

// Re-export interaction types
pub use interaction::{Interaction, Round, Stance, StanceCounts};

// Re-export outcome types
pub use outcome::{
    AgentSummary, EdgeSnapshot, GraphSnapshot, SimulationOutcome, Termination,
};

// Re-export report types
pub use report::{ArenaHealth, Objection, Report, SessionStatus};
