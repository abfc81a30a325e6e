//! Round Scheduler
//!
//! Drives one complete engine run. `prepare` builds the arena (population,
//! influence graph, feature signals) and `run` executes rounds 0..N-1 with
//! round-barrier semantics: every decision in a round reads only the
//! previous round's committed stances.
//!
//! Inside a round the per-agent decisions run on a rayon iterator over an
//! immutable snapshot; drafts then commit serially in agent order, which is
//! where sequence numbers and token deductions happen. Each (round, agent)
//! pair draws from its own RNG stream, so results do not depend on worker
//! count.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use arena_report::{
    AgentSummary, AgentType, Brief, FeatureSignals, Interaction, PopulationConfig, Round,
    SimulationOutcome, Stance, Termination,
};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::genome::{AgentGenome, AgentState};
use crate::graph::{AgentIdx, InfluenceGraph};
use crate::interaction::{AgentDecision, InteractionEngine};
use crate::logger::InteractionLogger;
use crate::persona::PersonaFactory;
use crate::rng::SessionRng;
use crate::signals::extract_feature_signals;

/// One prepared engine run.
///
/// Population, graph and signals are fixed at `prepare`; only token state
/// and the round history change while running. `run` consumes the
/// simulation, so a finished arena cannot be restarted with spent tokens.
pub struct Simulation {
    rng: SessionRng,
    population: PopulationConfig,
    engine_config: EngineConfig,
    agents: Vec<AgentGenome>,
    states: Vec<AgentState>,
    graph: InfluenceGraph,
    signals: Vec<FeatureSignals>,
    logger: InteractionLogger,
}

impl Simulation {
    /// Builds the arena for a brief: validates inputs, resolves the seed,
    /// generates the population, wires the influence graph and scores the
    /// brief's features.
    pub fn prepare(
        brief: &Brief,
        population: &PopulationConfig,
        engine_config: &EngineConfig,
    ) -> Result<Self> {
        brief.validate()?;
        engine_config.validate()?;

        let rng = SessionRng::new(population.seed);
        let factory = PersonaFactory::new(population, engine_config.tokens)?;

        let mut persona_rng = rng.persona_rng();
        let agents = factory.generate(&mut persona_rng);

        let mut graph_rng = rng.graph_rng();
        let graph = InfluenceGraph::build(
            &agents,
            population.topology,
            &engine_config.graph,
            &mut graph_rng,
        );

        let signals = extract_feature_signals(brief);
        let states = agents
            .iter()
            .map(|agent| AgentState::fresh(agent.token_budget))
            .collect();

        info!(
            seed = rng.seed(),
            population = agents.len(),
            topology = %population.topology,
            features = signals.len(),
            "prepared simulation"
        );

        Ok(Self {
            rng,
            population: population.clone(),
            engine_config: engine_config.clone(),
            agents,
            states,
            graph,
            signals,
            logger: InteractionLogger::null(),
        })
    }

    /// Attaches a JSONL interaction log for this run.
    pub fn with_logger(mut self, logger: InteractionLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Seed the run will use, resolved from the configuration or freshly
    /// drawn when none was given.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn agents(&self) -> &[AgentGenome] {
        &self.agents
    }

    /// Runs rounds until the configured count completes, every agent runs
    /// out of tokens, or `cancel` is observed at a round boundary.
    pub fn run(mut self, cancel: &AtomicBool) -> SimulationOutcome {
        let rounds_requested = self.population.rounds;
        let mut rounds: Vec<Round> = Vec::with_capacity(rounds_requested as usize);
        let mut termination = Termination::AllRounds;

        for round_index in 0..rounds_requested {
            if cancel.load(Ordering::SeqCst) {
                termination = Termination::Cancelled;
                break;
            }
            if self.all_exhausted() {
                termination = Termination::TokensExhausted;
                break;
            }

            let round = self.run_round(round_index);
            debug!(
                round = round_index,
                interactions = round.interaction_count(),
                "committed round"
            );
            rounds.push(round);
        }

        if let Err(e) = self.logger.flush() {
            warn!(error = %e, "interaction log flush failed");
        }

        let rounds_run = rounds.len() as u32;
        info!(
            seed = self.rng.seed(),
            rounds_run,
            termination = ?termination,
            interactions = rounds.iter().map(Round::interaction_count).sum::<usize>(),
            "run finished"
        );

        SimulationOutcome {
            seed: self.rng.seed(),
            topology: self.population.topology,
            population_size: self.population.population_size,
            rounds_requested,
            rounds_run,
            termination,
            rounds,
            graph: self.graph.snapshot(&self.agents),
            feature_signals: self.signals.clone(),
            agent_summaries: self.agent_summaries(),
        }
    }

    /// One round: parallel draft pass over the previous round's stances,
    /// then a serial commit pass in agent order.
    fn run_round(&mut self, round_index: u32) -> Round {
        let prior_stances: Vec<Option<Stance>> =
            self.states.iter().map(|s| s.last_stance).collect();
        let tokens: Vec<u32> = self.states.iter().map(|s| s.tokens_remaining).collect();

        let engine = InteractionEngine::new(
            &self.signals,
            &self.graph,
            &self.agents,
            &self.engine_config.weights,
            &self.engine_config.costs,
            &self.engine_config.thresholds,
        );
        let session_rng = self.rng;

        let drafts: Vec<AgentDecision> = (0..self.agents.len())
            .into_par_iter()
            .map(|agent_index| {
                let mut rng = session_rng.agent_rng(round_index, agent_index as u32);
                engine.decide(
                    AgentIdx(agent_index as u32),
                    &prior_stances,
                    tokens[agent_index],
                    &mut rng,
                )
            })
            .collect();

        let mut round = Round::new(round_index);
        for (agent_index, draft) in drafts.into_iter().enumerate() {
            let AgentDecision::Post {
                feature_index,
                stance,
                cost,
            } = draft
            else {
                continue;
            };
            // commit refuses an overdraft; drafts are priced against the
            // same token snapshot, so this only trips on a broken config
            if !self.states[agent_index].commit(stance, cost) {
                warn!(agent = agent_index, cost, "draft exceeded tokens at commit");
                continue;
            }

            let genome = &self.agents[agent_index];
            let interaction = Interaction::new(
                round_index,
                round.interactions.len() as u32,
                genome.id.clone(),
                genome.agent_type,
                feature_index,
                stance,
                cost,
                genome.influence_score,
            );
            if let Err(e) = self.logger.log(&interaction) {
                warn!(error = %e, "interaction log write failed");
            }
            round.interactions.push(interaction);
        }
        round
    }

    fn all_exhausted(&self) -> bool {
        let cheapest = self.engine_config.costs.cheapest();
        self.states.iter().all(|s| s.tokens_remaining < cheapest)
    }

    /// Per-type aggregates in arena order, absent types skipped.
    fn agent_summaries(&self) -> Vec<AgentSummary> {
        AgentType::all()
            .iter()
            .filter_map(|&agent_type| {
                let mut count = 0u32;
                let mut influence = 0.0f32;
                let mut remaining = 0.0f32;
                let mut spent = 0.0f32;
                for (genome, state) in self.agents.iter().zip(&self.states) {
                    if genome.agent_type != agent_type {
                        continue;
                    }
                    count += 1;
                    influence += genome.influence_score;
                    remaining += state.tokens_remaining as f32;
                    spent += state.tokens_spent as f32;
                }
                if count == 0 {
                    return None;
                }
                let n = count as f32;
                Some(AgentSummary {
                    agent_type,
                    count,
                    mean_influence: influence / n,
                    mean_tokens_remaining: remaining / n,
                    mean_tokens_spent: spent / n,
                })
            })
            .collect()
    }
}
