//! Agent Genome
//!
//! The full persona DNA of one market actor: demographics, psychographic
//! dials, personality tags, influence score and attention-token budget.
//! Also the small mutable state each agent carries from round to round.

use serde::{Deserialize, Serialize};

use arena_report::{AgentType, PersonalityTrait, Stance};

/// Coarse income band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeLevel {
    Low,
    Middle,
    High,
}

/// Settlement kind the agent lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Urban,
    Suburban,
    Rural,
}

/// Highest education level reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    College,
    Graduate,
}

/// Demographic slice of a genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: u32,
    pub income_level: IncomeLevel,
    pub location: LocationKind,
    pub education: EducationLevel,
}

/// Behavioral dials, each in 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Psychographics {
    /// Comfort with new technology.
    pub tech_savviness: f32,
    /// Sensitivity to price and cost signals.
    pub price_sensitivity: f32,
    /// Attachment to products already in use.
    pub brand_loyalty: f32,
}

/// Full persona DNA for one market actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentGenome {
    /// Stable readable id, `agent_{type}_{index:04}`.
    pub id: String,
    pub agent_type: AgentType,
    pub demographics: Demographics,
    pub psychographics: Psychographics,
    /// Personality tags, kept sorted for stable iteration.
    pub traits: Vec<PersonalityTrait>,
    /// How strongly this agent sways its graph neighbors, 0.0 to 1.0.
    pub influence_score: f32,
    /// Initial attention-token allotment for the session.
    pub token_budget: u32,
}

impl AgentGenome {
    pub fn has_trait(&self, tag: PersonalityTrait) -> bool {
        self.traits.contains(&tag)
    }

    /// Jaccard overlap of personality tags with another genome, in [0, 1].
    /// Two tagless genomes have zero affinity.
    pub fn trait_affinity(&self, other: &AgentGenome) -> f32 {
        if self.traits.is_empty() && other.traits.is_empty() {
            return 0.0;
        }
        let shared = self
            .traits
            .iter()
            .filter(|t| other.traits.contains(t))
            .count();
        let union = self.traits.len() + other.traits.len() - shared;
        shared as f32 / union as f32
    }
}

/// Mutable per-agent state carried across rounds.
///
/// Round N+1 reads the state committed at the end of round N; nothing else
/// crosses the round barrier. Token arithmetic is checked, so the balance
/// can never go below zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub tokens_remaining: u32,
    pub tokens_spent: u32,
    /// Most recent committed stance, if the agent has acted this session.
    pub last_stance: Option<Stance>,
}

impl AgentState {
    pub fn fresh(token_budget: u32) -> Self {
        Self {
            tokens_remaining: token_budget,
            tokens_spent: 0,
            last_stance: None,
        }
    }

    /// Commits a post: deducts the cost and records the stance. Returns
    /// false without mutating anything when the balance cannot cover it.
    pub fn commit(&mut self, stance: Stance, cost: u32) -> bool {
        match self.tokens_remaining.checked_sub(cost) {
            Some(rest) => {
                self.tokens_remaining = rest;
                self.tokens_spent += cost;
                self.last_stance = Some(stance);
                true
            }
            None => false,
        }
    }
}
