//! Population Vocabulary and Configuration
//!
//! Agent categories, personality tags, graph topology names, and the
//! population mix record callers submit when configuring a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market actor categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Customer,
    Competitor,
    Influencer,
    InternalTeam,
}

impl AgentType {
    /// All types in the fixed order used for percentage mixes and summaries.
    pub fn all() -> &'static [AgentType] {
        &[
            AgentType::Customer,
            AgentType::Competitor,
            AgentType::Influencer,
            AgentType::InternalTeam,
        ]
    }

    /// Default attention-token budget for the type.
    pub fn default_token_budget(&self) -> u32 {
        match self {
            AgentType::Customer => 100,
            AgentType::Competitor => 150,
            AgentType::Influencer => 120,
            AgentType::InternalTeam => 90,
        }
    }

    /// Stable lowercase label used in agent ids and log output.
    pub fn label(&self) -> &'static str {
        match self {
            AgentType::Customer => "customer",
            AgentType::Competitor => "competitor",
            AgentType::Influencer => "influencer",
            AgentType::InternalTeam => "internal_team",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Personality tags attached to agent genomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTrait {
    EarlyAdopter,
    LateMajority,
    Laggard,
    Influencer,
    Skeptic,
    Enthusiast,
}

impl PersonalityTrait {
    pub fn all() -> &'static [PersonalityTrait] {
        &[
            PersonalityTrait::EarlyAdopter,
            PersonalityTrait::LateMajority,
            PersonalityTrait::Laggard,
            PersonalityTrait::Influencer,
            PersonalityTrait::Skeptic,
            PersonalityTrait::Enthusiast,
        ]
    }
}

impl fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PersonalityTrait::EarlyAdopter => "early_adopter",
            PersonalityTrait::LateMajority => "late_majority",
            PersonalityTrait::Laggard => "laggard",
            PersonalityTrait::Influencer => "influencer",
            PersonalityTrait::Skeptic => "skeptic",
            PersonalityTrait::Enthusiast => "enthusiast",
        };
        write!(f, "{}", label)
    }
}

/// Structural family of the influence graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Dense clusters by agent type, sparse bridges between them.
    EchoChamber,
    /// Sparse random graph, well mixed but not fully connected.
    #[default]
    LooseNetwork,
    /// Hub-dominated follower structure skewed by influence score.
    RealFollower,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Topology::EchoChamber => "echo_chamber",
            Topology::LooseNetwork => "loose_network",
            Topology::RealFollower => "real_follower",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Topology {
    type Err = ParseTopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "echo_chamber" => Ok(Topology::EchoChamber),
            "loose_network" => Ok(Topology::LooseNetwork),
            "real_follower" => Ok(Topology::RealFollower),
            _ => Err(ParseTopologyError(s.to_string())),
        }
    }
}

/// Error for unrecognized topology names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTopologyError(pub String);

impl fmt::Display for ParseTopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown topology '{}', expected one of: echo_chamber, loose_network, real_follower",
            self.0
        )
    }
}

impl std::error::Error for ParseTopologyError {}

/// Population mix and run parameters for a session.
///
/// Percentages are raw slider values from callers; they need not sum to 100
/// and are normalized proportionally before agent generation. The optional
/// seed drives every random draw in the run; when absent the engine picks a
/// fresh seed and records it for replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub population_size: u32,
    pub customer_percentage: f32,
    pub competitor_percentage: f32,
    pub influencer_percentage: f32,
    pub internal_team_percentage: f32,
    #[serde(default)]
    pub topology: Topology,
    pub rounds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            customer_percentage: 60.0,
            competitor_percentage: 20.0,
            influencer_percentage: 10.0,
            internal_team_percentage: 10.0,
            topology: Topology::LooseNetwork,
            rounds: 3,
            seed: None,
        }
    }
}

impl PopulationConfig {
    /// Rejects configurations the engine cannot run: zero population,
    /// negative percentages, or a mix with no positive share at all.
    pub fn validate(&self) -> Result<(), InvalidPopulationConfig> {
        if self.population_size == 0 {
            return Err(InvalidPopulationConfig::ZeroPopulation);
        }
        for (name, value) in self.percentage_fields() {
            if value < 0.0 || !value.is_finite() {
                return Err(InvalidPopulationConfig::NegativePercentage(name));
            }
        }
        if self.percentage_sum() <= 0.0 {
            return Err(InvalidPopulationConfig::NoPositiveShare);
        }
        Ok(())
    }

    /// Raw percentage values paired with field names, in [`AgentType::all`]
    /// order.
    pub fn percentage_fields(&self) -> [(&'static str, f32); 4] {
        [
            ("customer_percentage", self.customer_percentage),
            ("competitor_percentage", self.competitor_percentage),
            ("influencer_percentage", self.influencer_percentage),
            ("internal_team_percentage", self.internal_team_percentage),
        ]
    }

    pub fn percentage_sum(&self) -> f32 {
        self.customer_percentage
            + self.competitor_percentage
            + self.influencer_percentage
            + self.internal_team_percentage
    }

    /// Per-type shares normalized to sum to 1.0, in [`AgentType::all`] order.
    ///
    /// This is the documented adjustment rule: each share is divided by the
    /// raw sum, so {60, 20, 10, 10} and {6, 2, 1, 1} describe the same mix.
    /// Call [`PopulationConfig::validate`] first; a zero or negative sum has
    /// no normalization.
    pub fn normalized_shares(&self) -> [f32; 4] {
        let sum = self.percentage_sum();
        [
            self.customer_percentage / sum,
            self.competitor_percentage / sum,
            self.influencer_percentage / sum,
            self.internal_team_percentage / sum,
        ]
    }

    /// True when the caller's raw percentages already sum to 100 within a
    /// small tolerance, meaning normalization changes nothing.
    pub fn sums_to_hundred(&self) -> bool {
        (self.percentage_sum() - 100.0).abs() < 0.01
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }
}

/// Why a population configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPopulationConfig {
    ZeroPopulation,
    NegativePercentage(&'static str),
    NoPositiveShare,
}

impl fmt::Display for InvalidPopulationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPopulationConfig::ZeroPopulation => {
                write!(f, "population size must be at least 1")
            }
            InvalidPopulationConfig::NegativePercentage(field) => {
                write!(f, "{} must be a non-negative finite number", field)
            }
            InvalidPopulationConfig::NoPositiveShare => {
                write!(f, "at least one agent type percentage must be positive")
            }
        }
    }
}

impl std::error::Error for InvalidPopulationConfig {}
