//! Persona Factory
//!
//! Generates the agent population for a session from a percentage mix.
//! Per-type counts come from largest-remainder rounding so they always sum
//! exactly to the requested size; demographics and psychographics are drawn
//! from type-specific distributions.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use arena_report::{AgentType, PersonalityTrait, PopulationConfig};

use crate::config::TokenBudgets;
use crate::error::Result;
use crate::genome::{
    AgentGenome, Demographics, EducationLevel, IncomeLevel, LocationKind, Psychographics,
};

/// Builds agent genomes from a validated population configuration.
pub struct PersonaFactory {
    config: PopulationConfig,
    budgets: TokenBudgets,
}

impl PersonaFactory {
    /// Validates the configuration up front; a zero population or a mix
    /// without any positive share is rejected here, before any session work.
    pub fn new(config: &PopulationConfig, budgets: TokenBudgets) -> Result<Self> {
        config.validate()?;
        if !config.sums_to_hundred() {
            warn!(
                sum = config.percentage_sum(),
                "population percentages do not sum to 100, normalizing proportionally"
            );
        }
        Ok(Self {
            config: config.clone(),
            budgets,
        })
    }

    /// Per-type counts by largest-remainder rounding.
    ///
    /// Each ideal share is floored, then the leftover agents go to the types
    /// with the largest fractional remainders, earlier types winning ties.
    /// The counts always sum exactly to the configured population size.
    pub fn type_counts(&self) -> [(AgentType, u32); 4] {
        let size = self.config.population_size;
        let shares = self.config.normalized_shares();

        let ideals: Vec<f64> = shares.iter().map(|s| *s as f64 * size as f64).collect();
        let mut counts: Vec<u32> = ideals.iter().map(|i| i.floor() as u32).collect();
        let assigned: u32 = counts.iter().sum();

        let mut order: Vec<usize> = (0..4).collect();
        order.sort_by(|&a, &b| {
            let rem_a = ideals[a] - ideals[a].floor();
            let rem_b = ideals[b] - ideals[b].floor();
            rem_b.partial_cmp(&rem_a).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
        });

        for slot in 0..(size - assigned) as usize {
            counts[order[slot % 4]] += 1;
        }

        let types = AgentType::all();
        [
            (types[0], counts[0]),
            (types[1], counts[1]),
            (types[2], counts[2]),
            (types[3], counts[3]),
        ]
    }

    /// Generates the population in arena order: all customers first, then
    /// competitors, influencers and internal team, each numbered per type.
    pub fn generate(&self, rng: &mut ChaCha8Rng) -> Vec<AgentGenome> {
        let counts = self.type_counts();
        let mut population = Vec::with_capacity(self.config.population_size as usize);

        for (agent_type, count) in counts {
            for index in 0..count {
                population.push(self.generate_one(agent_type, index, rng));
            }
        }

        debug!(
            total = population.len(),
            customers = counts[0].1,
            competitors = counts[1].1,
            influencers = counts[2].1,
            internal_team = counts[3].1,
            "generated population"
        );
        population
    }

    fn generate_one(&self, agent_type: AgentType, index: u32, rng: &mut ChaCha8Rng) -> AgentGenome {
        let id = format!("agent_{}_{:04}", agent_type.label(), index);
        let demographics = sample_demographics(agent_type, rng);
        let psychographics = sample_psychographics(agent_type, rng);
        let traits = sample_traits(agent_type, rng);
        let influence_score = sample_influence(agent_type, rng);

        AgentGenome {
            id,
            agent_type,
            demographics,
            psychographics,
            traits,
            influence_score,
            token_budget: self.budgets.budget_for(agent_type),
        }
    }
}

fn sample_demographics(agent_type: AgentType, rng: &mut ChaCha8Rng) -> Demographics {
    let pick_income = |rng: &mut ChaCha8Rng, options: &[IncomeLevel]| {
        options[rng.gen_range(0..options.len())]
    };
    let pick_location = |rng: &mut ChaCha8Rng, options: &[LocationKind]| {
        options[rng.gen_range(0..options.len())]
    };
    let pick_education = |rng: &mut ChaCha8Rng, options: &[EducationLevel]| {
        options[rng.gen_range(0..options.len())]
    };

    match agent_type {
        AgentType::Customer => Demographics {
            age: rng.gen_range(18..=65),
            income_level: pick_income(
                rng,
                &[IncomeLevel::Low, IncomeLevel::Middle, IncomeLevel::High],
            ),
            location: pick_location(
                rng,
                &[LocationKind::Urban, LocationKind::Suburban, LocationKind::Rural],
            ),
            education: pick_education(
                rng,
                &[EducationLevel::HighSchool, EducationLevel::College, EducationLevel::Graduate],
            ),
        },
        AgentType::Competitor => Demographics {
            age: rng.gen_range(28..=60),
            income_level: pick_income(rng, &[IncomeLevel::Middle, IncomeLevel::High]),
            location: pick_location(rng, &[LocationKind::Urban, LocationKind::Suburban]),
            education: pick_education(rng, &[EducationLevel::College, EducationLevel::Graduate]),
        },
        AgentType::Influencer => Demographics {
            age: rng.gen_range(18..=45),
            income_level: pick_income(rng, &[IncomeLevel::Middle, IncomeLevel::High]),
            // skew urban; influencer reach concentrates in cities
            location: pick_location(
                rng,
                &[LocationKind::Urban, LocationKind::Urban, LocationKind::Suburban],
            ),
            education: pick_education(
                rng,
                &[EducationLevel::HighSchool, EducationLevel::College, EducationLevel::Graduate],
            ),
        },
        AgentType::InternalTeam => Demographics {
            age: rng.gen_range(24..=58),
            income_level: pick_income(rng, &[IncomeLevel::Middle, IncomeLevel::High]),
            location: pick_location(rng, &[LocationKind::Urban, LocationKind::Suburban]),
            education: pick_education(rng, &[EducationLevel::College, EducationLevel::Graduate]),
        },
    }
}

fn sample_psychographics(agent_type: AgentType, rng: &mut ChaCha8Rng) -> Psychographics {
    let uniform = |rng: &mut ChaCha8Rng, lo: f32, hi: f32| rng.gen_range(lo..hi);

    match agent_type {
        AgentType::Customer => Psychographics {
            tech_savviness: uniform(rng, 0.2, 1.0),
            price_sensitivity: uniform(rng, 0.3, 0.9),
            brand_loyalty: uniform(rng, 0.1, 0.8),
        },
        AgentType::Competitor => Psychographics {
            tech_savviness: uniform(rng, 0.6, 1.0),
            price_sensitivity: uniform(rng, 0.2, 0.6),
            // loyalty to their own product, which reads as resistance here
            brand_loyalty: uniform(rng, 0.7, 1.0),
        },
        AgentType::Influencer => Psychographics {
            tech_savviness: uniform(rng, 0.5, 1.0),
            price_sensitivity: uniform(rng, 0.2, 0.7),
            brand_loyalty: uniform(rng, 0.1, 0.4),
        },
        AgentType::InternalTeam => Psychographics {
            tech_savviness: uniform(rng, 0.5, 0.95),
            price_sensitivity: uniform(rng, 0.3, 0.7),
            brand_loyalty: uniform(rng, 0.5, 0.9),
        },
    }
}

fn sample_influence(agent_type: AgentType, rng: &mut ChaCha8Rng) -> f32 {
    match agent_type {
        AgentType::Customer => rng.gen_range(0.1..0.6),
        AgentType::Competitor => rng.gen_range(0.6..0.9),
        AgentType::Influencer => rng.gen_range(0.7..1.0),
        AgentType::InternalTeam => rng.gen_range(0.4..0.7),
    }
}

/// Tag each type always carries, plus up to two extra random tags.
fn sample_traits(agent_type: AgentType, rng: &mut ChaCha8Rng) -> Vec<PersonalityTrait> {
    let required = match agent_type {
        AgentType::Customer => None,
        AgentType::Competitor => Some(PersonalityTrait::Skeptic),
        AgentType::Influencer => Some(PersonalityTrait::Influencer),
        AgentType::InternalTeam => Some(PersonalityTrait::Enthusiast),
    };

    let extra = match agent_type {
        // customers get 1 to 3 tags, everyone else 0 to 2 on top of the
        // required one
        AgentType::Customer => rng.gen_range(1..=3),
        _ => rng.gen_range(0..=2),
    };

    let mut traits: Vec<PersonalityTrait> = PersonalityTrait::all()
        .choose_multiple(rng, extra)
        .copied()
        .collect();
    if let Some(tag) = required {
        traits.push(tag);
    }
    traits.sort();
    traits.dedup();
    traits
}
