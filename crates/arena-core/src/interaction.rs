//! Interaction Propensity Calculation
//!
//! Multi-factor propensity calculation for stance selection. Each round an
//! agent scores every brief feature, weighted by:
//! - Type bias (competitors push against, internal team pushes for)
//! - Personality-trait bias (enthusiasts up, skeptics and laggards down)
//! - Novelty pull (tech-savvy agents reward novel features)
//! - Cost drag (price-sensitive agents punish implied cost)
//! - Loyalty drag (brand-loyal agents resist competitor-angled features)
//! - Social pull (inbound neighbors' prior-round stances)
//! - A small seeded jitter from the agent's own stream
//!
//! The feature with the strongest reaction, for or against, wins; the signed
//! total then thresholds into a stance.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_report::{FeatureSignals, Stance};

use crate::config::{ActionCosts, InteractionWeights, StanceThresholds};
use crate::genome::AgentGenome;
use crate::graph::{AgentIdx, InfluenceGraph};

/// Fixed propensity offsets per personality trait
pub mod trait_bias {
    use arena_report::PersonalityTrait;

    pub const EARLY_ADOPTER: f32 = 0.10;
    pub const LATE_MAJORITY: f32 = -0.03;
    pub const LAGGARD: f32 = -0.08;
    pub const INFLUENCER: f32 = 0.05;
    pub const SKEPTIC: f32 = -0.12;
    pub const ENTHUSIAST: f32 = 0.15;

    pub fn for_trait(tag: PersonalityTrait) -> f32 {
        match tag {
            PersonalityTrait::EarlyAdopter => EARLY_ADOPTER,
            PersonalityTrait::LateMajority => LATE_MAJORITY,
            PersonalityTrait::Laggard => LAGGARD,
            PersonalityTrait::Influencer => INFLUENCER,
            PersonalityTrait::Skeptic => SKEPTIC,
            PersonalityTrait::Enthusiast => ENTHUSIAST,
        }
    }

    /// Sum of the offsets for every trait an agent carries
    pub fn combined(traits: &[PersonalityTrait]) -> f32 {
        traits.iter().copied().map(for_trait).sum()
    }
}

/// Signed per-factor breakdown of one feature's propensity
#[derive(Debug, Clone, Copy, Default)]
pub struct FeaturePropensity {
    /// Bias from the agent's type alone
    pub type_bias: f32,
    /// Sum of personality-trait offsets
    pub trait_bias: f32,
    /// Pull from feature novelty vs. tech savviness (signed)
    pub novelty_pull: f32,
    /// Drag from implied cost vs. price sensitivity (zero or negative)
    pub cost_drag: f32,
    /// Drag from competitor angle vs. brand loyalty (signed)
    pub loyalty_drag: f32,
    /// Weighted average of inbound neighbors' prior stances
    pub social_pull: f32,
    /// Seeded noise term
    pub jitter: f32,
}

impl FeaturePropensity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed total; positive leans advocate, negative leans saboteur
    pub fn total(&self) -> f32 {
        self.type_bias
            + self.trait_bias
            + self.novelty_pull
            + self.cost_drag
            + self.loyalty_drag
            + self.social_pull
            + self.jitter
    }

    pub fn with_type_bias(mut self, bias: f32) -> Self {
        self.type_bias = bias;
        self
    }

    pub fn with_trait_bias(mut self, bias: f32) -> Self {
        self.trait_bias = bias;
        self
    }

    pub fn with_novelty(mut self, pull: f32) -> Self {
        self.novelty_pull = pull;
        self
    }

    pub fn with_cost(mut self, drag: f32) -> Self {
        self.cost_drag = drag;
        self
    }

    pub fn with_loyalty(mut self, drag: f32) -> Self {
        self.loyalty_drag = drag;
        self
    }

    pub fn with_social(mut self, pull: f32) -> Self {
        self.social_pull = pull;
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }
}

/// What one agent does with its turn in a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentDecision {
    /// Not enough tokens, or nothing to react to.
    Abstain,
    /// Post a stance on one feature at the given token cost.
    Post {
        feature_index: usize,
        stance: Stance,
        cost: u32,
    },
}

/// Computes one decision per agent per round from immutable session state.
///
/// Borrows everything it reads, so the scheduler can share one engine
/// across its parallel per-agent draft passes.
pub struct InteractionEngine<'a> {
    signals: &'a [FeatureSignals],
    graph: &'a InfluenceGraph,
    agents: &'a [AgentGenome],
    weights: &'a InteractionWeights,
    costs: &'a ActionCosts,
    thresholds: &'a StanceThresholds,
}

impl<'a> InteractionEngine<'a> {
    pub fn new(
        signals: &'a [FeatureSignals],
        graph: &'a InfluenceGraph,
        agents: &'a [AgentGenome],
        weights: &'a InteractionWeights,
        costs: &'a ActionCosts,
        thresholds: &'a StanceThresholds,
    ) -> Self {
        Self {
            signals,
            graph,
            agents,
            weights,
            costs,
            thresholds,
        }
    }

    /// Decides the agent's action from the previous round's committed
    /// stances. Draws one jitter value per feature, in feature order, from
    /// the passed stream; the caller owns stream selection.
    pub fn decide(
        &self,
        agent: AgentIdx,
        prior_stances: &[Option<Stance>],
        tokens_remaining: u32,
        rng: &mut ChaCha8Rng,
    ) -> AgentDecision {
        if tokens_remaining < self.costs.cheapest() {
            return AgentDecision::Abstain;
        }

        let genome = &self.agents[agent.index()];
        let social = self.social_pull(agent, prior_stances);

        let mut best: Option<(usize, f32)> = None;
        for (index, signals) in self.signals.iter().enumerate() {
            let jitter = (rng.gen::<f32>() - 0.5) * self.weights.jitter;
            let propensity = self.score_feature(genome, signals, social, jitter).total();

            // strongest reaction wins, earlier feature keeps ties
            let stronger = match best {
                None => true,
                Some((_, current)) => propensity.abs() > current.abs(),
            };
            if stronger {
                best = Some((index, propensity));
            }
        }
        let Some((feature_index, propensity)) = best else {
            return AgentDecision::Abstain;
        };

        let stance = self.thresholds.classify(propensity);
        let cost = self.costs.for_stance(stance);
        if cost <= tokens_remaining {
            return AgentDecision::Post {
                feature_index,
                stance,
                cost,
            };
        }

        // cannot afford the reaction it wants; settle for a neutral mention
        let neutral_cost = self.costs.for_stance(Stance::Neutral);
        if neutral_cost <= tokens_remaining {
            return AgentDecision::Post {
                feature_index,
                stance: Stance::Neutral,
                cost: neutral_cost,
            };
        }
        AgentDecision::Abstain
    }

    fn score_feature(
        &self,
        genome: &AgentGenome,
        signals: &FeatureSignals,
        social: f32,
        jitter: f32,
    ) -> FeaturePropensity {
        let psycho = &genome.psychographics;
        FeaturePropensity::new()
            .with_type_bias(self.weights.type_bias(genome.agent_type))
            .with_trait_bias(trait_bias::combined(&genome.traits))
            .with_novelty(self.weights.novelty * (psycho.tech_savviness - 0.5) * signals.novelty)
            .with_cost(-self.weights.cost * psycho.price_sensitivity * signals.cost_pressure)
            .with_loyalty(
                -self.weights.loyalty * (psycho.brand_loyalty - 0.5) * signals.competitor_angle,
            )
            .with_social(self.weights.social * social)
            .with_jitter(jitter)
    }

    /// Weighted average of inbound neighbors' last committed stance, each
    /// neighbor scaled by edge weight times its influence score. Agents with
    /// no posting neighbors feel no pull.
    fn social_pull(&self, agent: AgentIdx, prior_stances: &[Option<Stance>]) -> f32 {
        let mut pull = 0.0;
        let mut total_strength = 0.0;
        for edge in self.graph.inbound(agent) {
            let Some(stance) = prior_stances[edge.source.index()] else {
                continue;
            };
            let strength = edge.weight * self.agents[edge.source.index()].influence_score;
            pull += strength * stance.signal();
            total_strength += strength;
        }
        if total_strength > 0.0 {
            pull / total_strength
        } else {
            0.0
        }
    }
}
