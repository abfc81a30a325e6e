//! Simulation engine: personas, influence graph, interactions, rounds.

pub mod config;
pub mod error;
pub mod genome;
pub mod graph;
pub mod interaction;
pub mod logger;
pub mod persona;
pub mod rng;
pub mod scheduler;
pub mod signals;

pub use config::{default_config_toml, EngineConfig};
pub use error::{EngineError, Result};
pub use genome::{AgentGenome, AgentState};
pub use graph::InfluenceGraph;
pub use interaction::InteractionEngine;
pub use logger::InteractionLogger;
pub use persona::PersonaFactory;
pub use rng::SessionRng;
pub use scheduler::Simulation;
pub use signals::extract_feature_signals;
