//! Engine Tuning
//!
//! All engine knobs live in one TOML-loadable record: propensity weights,
//! action costs, stance thresholds, token budgets and graph shape. Every
//! section is optional in a config file; absent fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use arena_report::{AgentType, Stance};

use crate::error::{EngineError, Result};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Propensity term weights
    #[serde(default)]
    pub weights: InteractionWeights,
    /// Token costs per action
    #[serde(default)]
    pub costs: ActionCosts,
    /// Propensity cutoffs for stance classification
    #[serde(default)]
    pub thresholds: StanceThresholds,
    /// Per-type attention-token budgets
    #[serde(default)]
    pub tokens: TokenBudgets,
    /// Influence graph shape parameters
    #[serde(default)]
    pub graph: GraphTuning,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Tuning(e.to_string()))
    }

    /// Rejects tunings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.thresholds.advocate_above <= self.thresholds.saboteur_below {
            return Err(EngineError::Tuning(format!(
                "advocate threshold {} must sit above saboteur threshold {}",
                self.thresholds.advocate_above, self.thresholds.saboteur_below
            )));
        }
        for (name, prob) in [
            ("echo_intra_edge_prob", self.graph.echo_intra_edge_prob),
            ("echo_inter_edge_prob", self.graph.echo_inter_edge_prob),
            ("loose_edge_prob", self.graph.loose_edge_prob),
        ] {
            if !(0.0..=1.0).contains(&prob) {
                return Err(EngineError::Tuning(format!(
                    "{} must be in [0, 1], got {}",
                    name, prob
                )));
            }
        }
        if !(0.0 < self.graph.hub_fraction && self.graph.hub_fraction <= 1.0) {
            return Err(EngineError::Tuning(format!(
                "hub_fraction must be in (0, 1], got {}",
                self.graph.hub_fraction
            )));
        }
        if self.graph.follower_min_sources == 0
            || self.graph.follower_min_sources > self.graph.follower_max_sources
        {
            return Err(EngineError::Tuning(format!(
                "follower source range {}..={} is invalid",
                self.graph.follower_min_sources, self.graph.follower_max_sources
            )));
        }
        Ok(())
    }
}

/// Propensity term weights.
///
/// The per-feature propensity is the sum of a type bias, fixed trait
/// biases, three psychographic-vs-signal terms scaled by the weights here,
/// the social pull of inbound neighbors, and a small seeded jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionWeights {
    /// Scale on (tech_savviness - 0.5) x feature novelty
    pub novelty: f32,
    /// Scale on price_sensitivity x cost pressure; always pushes down
    pub cost: f32,
    /// Scale on (brand_loyalty - 0.5) x competitor angle
    pub loyalty: f32,
    /// Scale on the inbound social average
    pub social: f32,
    /// Width of the uniform jitter around zero
    pub jitter: f32,
    /// Base bias per agent type
    pub customer_bias: f32,
    pub competitor_bias: f32,
    pub influencer_bias: f32,
    pub internal_team_bias: f32,
}

impl Default for InteractionWeights {
    fn default() -> Self {
        Self {
            novelty: 0.6,
            cost: 0.5,
            loyalty: 0.4,
            social: 0.45,
            jitter: 0.1,
            customer_bias: 0.0,
            competitor_bias: -0.25,
            influencer_bias: 0.05,
            internal_team_bias: 0.2,
        }
    }
}

impl InteractionWeights {
    pub fn type_bias(&self, agent_type: AgentType) -> f32 {
        match agent_type {
            AgentType::Customer => self.customer_bias,
            AgentType::Competitor => self.competitor_bias,
            AgentType::Influencer => self.influencer_bias,
            AgentType::InternalTeam => self.internal_team_bias,
        }
    }
}

/// Token costs per action. Posting any stance costs more than abstaining,
/// which is free.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCosts {
    pub advocate: u32,
    pub saboteur: u32,
    pub neutral: u32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            advocate: 10,
            saboteur: 12,
            neutral: 5,
        }
    }
}

impl ActionCosts {
    pub fn for_stance(&self, stance: Stance) -> u32 {
        match stance {
            Stance::Advocate => self.advocate,
            Stance::Saboteur => self.saboteur,
            Stance::Neutral => self.neutral,
        }
    }

    /// Cheapest way to post anything; agents below this balance abstain.
    pub fn cheapest(&self) -> u32 {
        self.advocate.min(self.saboteur).min(self.neutral)
    }
}

/// Propensity cutoffs for stance classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceThresholds {
    /// Propensity at or above this is an advocate
    pub advocate_above: f32,
    /// Propensity at or below this is a saboteur
    pub saboteur_below: f32,
}

impl Default for StanceThresholds {
    fn default() -> Self {
        Self {
            advocate_above: 0.15,
            saboteur_below: -0.15,
        }
    }
}

impl StanceThresholds {
    pub fn classify(&self, propensity: f32) -> Stance {
        if propensity >= self.advocate_above {
            Stance::Advocate
        } else if propensity <= self.saboteur_below {
            Stance::Saboteur
        } else {
            Stance::Neutral
        }
    }
}

/// Per-type attention-token budgets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenBudgets {
    pub customer: u32,
    pub competitor: u32,
    pub influencer: u32,
    pub internal_team: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            customer: AgentType::Customer.default_token_budget(),
            competitor: AgentType::Competitor.default_token_budget(),
            influencer: AgentType::Influencer.default_token_budget(),
            internal_team: AgentType::InternalTeam.default_token_budget(),
        }
    }
}

impl TokenBudgets {
    pub fn budget_for(&self, agent_type: AgentType) -> u32 {
        match agent_type {
            AgentType::Customer => self.customer,
            AgentType::Competitor => self.competitor,
            AgentType::Influencer => self.influencer,
            AgentType::InternalTeam => self.internal_team,
        }
    }
}

/// Influence graph shape parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphTuning {
    /// Edge probability inside an echo-chamber cluster
    pub echo_intra_edge_prob: f32,
    /// Edge probability between echo-chamber clusters
    pub echo_inter_edge_prob: f32,
    /// Base weight range for intra-cluster edges
    pub echo_intra_weight_min: f32,
    pub echo_intra_weight_max: f32,
    /// Base weight range for inter-cluster edges
    pub echo_inter_weight_min: f32,
    pub echo_inter_weight_max: f32,
    /// Independent edge probability in the loose network
    pub loose_edge_prob: f32,
    /// Base weight range for loose-network edges
    pub loose_weight_min: f32,
    pub loose_weight_max: f32,
    /// Share of the population acting as follower-network hubs
    pub hub_fraction: f32,
    /// Inbound hub edges per non-hub agent
    pub follower_min_sources: u32,
    pub follower_max_sources: u32,
    /// Multiplier range applied to the hub's influence score
    pub follower_weight_scale_min: f32,
    pub follower_weight_scale_max: f32,
    /// Weight added per unit of trait affinity between endpoints
    pub trait_affinity_weight: f32,
    /// Floor for any final edge weight
    pub min_edge_weight: f32,
}

impl Default for GraphTuning {
    fn default() -> Self {
        Self {
            echo_intra_edge_prob: 0.5,
            echo_inter_edge_prob: 0.08,
            echo_intra_weight_min: 0.55,
            echo_intra_weight_max: 0.9,
            echo_inter_weight_min: 0.05,
            echo_inter_weight_max: 0.25,
            loose_edge_prob: 0.15,
            loose_weight_min: 0.1,
            loose_weight_max: 0.9,
            hub_fraction: 0.2,
            follower_min_sources: 1,
            follower_max_sources: 3,
            follower_weight_scale_min: 0.7,
            follower_weight_scale_max: 1.0,
            trait_affinity_weight: 0.2,
            min_edge_weight: 0.05,
        }
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Engine Tuning

[weights]
novelty = 0.6
cost = 0.5
loyalty = 0.4
social = 0.45
jitter = 0.1
customer_bias = 0.0
competitor_bias = -0.25
influencer_bias = 0.05
internal_team_bias = 0.2

[costs]
advocate = 10
saboteur = 12
neutral = 5

[thresholds]
advocate_above = 0.15
saboteur_below = -0.15

[tokens]
customer = 100
competitor = 150
influencer = 120
internal_team = 90

[graph]
echo_intra_edge_prob = 0.5
echo_inter_edge_prob = 0.08
echo_intra_weight_min = 0.55
echo_intra_weight_max = 0.9
echo_inter_weight_min = 0.05
echo_inter_weight_max = 0.25
loose_edge_prob = 0.15
loose_weight_min = 0.1
loose_weight_max = 0.9
hub_fraction = 0.2
follower_min_sources = 1
follower_max_sources = 3
follower_weight_scale_min = 0.7
follower_weight_scale_max = 1.0
trait_affinity_weight = 0.2
min_edge_weight = 0.05
"#
    .to_string()
}
