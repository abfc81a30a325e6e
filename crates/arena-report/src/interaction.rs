//! Interaction and Round Types
//!
//! Interactions are the atomic units of simulation history. Each one records
//! a single committed agent action: which feature it addressed, the stance
//! taken, and the attention tokens spent. Rounds group interactions in
//! commit order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::population::AgentType;

/// An agent's expressed position on a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Advocate,
    Neutral,
    Saboteur,
}

impl Stance {
    /// Signed propagation value: advocate +1, neutral 0, saboteur -1.
    pub fn signal(&self) -> f32 {
        match self {
            Stance::Advocate => 1.0,
            Stance::Neutral => 0.0,
            Stance::Saboteur => -1.0,
        }
    }

    pub fn all() -> &'static [Stance] {
        &[Stance::Advocate, Stance::Neutral, Stance::Saboteur]
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stance::Advocate => "advocate",
            Stance::Neutral => "neutral",
            Stance::Saboteur => "saboteur",
        };
        write!(f, "{}", label)
    }
}

/// One committed agent action within a round.
///
/// Carries a snapshot of the acting agent's type and influence score at
/// commit time so downstream analysis never needs the full population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Round the interaction was committed in (0-based).
    pub round: u32,
    /// Position in the round's commit sequence.
    pub seq: u32,
    pub agent_id: String,
    pub agent_type: AgentType,
    /// Present when the action addresses a single agent; broadcast otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Index into the brief's feature list.
    pub feature_index: usize,
    pub stance: Stance,
    /// Attention tokens spent on this action.
    pub token_cost: u32,
    /// Acting agent's influence score at commit time.
    pub influence_score: f32,
}

impl Interaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        round: u32,
        seq: u32,
        agent_id: impl Into<String>,
        agent_type: AgentType,
        feature_index: usize,
        stance: Stance,
        token_cost: u32,
        influence_score: f32,
    ) -> Self {
        Self {
            round,
            seq,
            agent_id: agent_id.into(),
            agent_type,
            target_id: None,
            feature_index,
            stance,
            token_cost,
            influence_score,
        }
    }

    /// Addresses the action to a single agent instead of broadcasting.
    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    pub fn is_broadcast(&self) -> bool {
        self.target_id.is_none()
    }
}

/// All interactions committed in one round, in commit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub index: u32,
    pub interactions: Vec<Interaction>,
}

impl Round {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            interactions: Vec::new(),
        }
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    pub fn stance_counts(&self) -> StanceCounts {
        let mut counts = StanceCounts::default();
        for interaction in &self.interactions {
            counts.add(interaction.stance);
        }
        counts
    }
}

/// Simple stance tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceCounts {
    pub advocates: u32,
    pub neutrals: u32,
    pub saboteurs: u32,
}

impl StanceCounts {
    pub fn add(&mut self, stance: Stance) {
        match stance {
            Stance::Advocate => self.advocates += 1,
            Stance::Neutral => self.neutrals += 1,
            Stance::Saboteur => self.saboteurs += 1,
        }
    }

    pub fn absorb(&mut self, other: StanceCounts) {
        self.advocates += other.advocates;
        self.neutrals += other.neutrals;
        self.saboteurs += other.saboteurs;
    }

    pub fn total(&self) -> u32 {
        self.advocates + self.neutrals + self.saboteurs
    }

    /// Interactions that took a side, advocate or saboteur.
    pub fn expressed(&self) -> u32 {
        self.advocates + self.saboteurs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stance_signal_values() {
        assert_eq!(Stance::Advocate.signal(), 1.0);
        assert_eq!(Stance::Neutral.signal(), 0.0);
        assert_eq!(Stance::Saboteur.signal(), -1.0);
    }

    #[test]
    fn test_stance_serialization() {
        assert_eq!(serde_json::to_string(&Stance::Saboteur).unwrap(), r#""saboteur""#);
        let back: Stance = serde_json::from_str(r#""advocate""#).unwrap();
        assert_eq!(back, Stance::Advocate);
    }

    #[test]
    fn test_interaction_broadcast_by_default() {
        let interaction = Interaction::new(
            0,
            0,
            "agent_customer_0000",
            AgentType::Customer,
            1,
            Stance::Advocate,
            10,
            0.4,
        );
        assert!(interaction.is_broadcast());

        let json = serde_json::to_string(&interaction).unwrap();
        assert!(!json.contains("target_id"));

        let targeted = interaction.with_target("agent_customer_0001");
        assert!(!targeted.is_broadcast());
        let json = serde_json::to_string(&targeted).unwrap();
        assert!(json.contains("agent_customer_0001"));
    }

    #[test]
    fn test_round_stance_counts() {
        let mut round = Round::new(0);
        for (i, stance) in [Stance::Advocate, Stance::Advocate, Stance::Saboteur, Stance::Neutral]
            .iter()
            .enumerate()
        {
            round.interactions.push(Interaction::new(
                0,
                i as u32,
                format!("agent_customer_{:04}", i),
                AgentType::Customer,
                0,
                *stance,
                5,
                0.3,
            ));
        }

        let counts = round.stance_counts();
        assert_eq!(counts.advocates, 2);
        assert_eq!(counts.neutrals, 1);
        assert_eq!(counts.saboteurs, 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.expressed(), 3);
    }

    #[test]
    fn test_stance_counts_absorb() {
        let mut a = StanceCounts {
            advocates: 2,
            neutrals: 1,
            saboteurs: 0,
        };
        a.absorb(StanceCounts {
            advocates: 1,
            neutrals: 0,
            saboteurs: 3,
        });
        assert_eq!(a.advocates, 3);
        assert_eq!(a.neutrals, 1);
        assert_eq!(a.saboteurs, 3);
    }
}
