//! Influence Graph
//!
//! Builds the directed who-sways-whom graph for a session. An edge
//! `source -> target` means the source's posts pull on the target's
//! propensity; propagation therefore reads each agent's inbound edges.
//! Three topologies are supported: echo chambers clustered by agent type,
//! a loose random network, and a hub-driven follower network.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use arena_report::{EdgeSnapshot, GraphSnapshot, Topology};

use crate::config::GraphTuning;
use crate::genome::AgentGenome;

/// Index of an agent in the session's population vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentIdx(pub u32);

impl AgentIdx {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One inbound edge: who sways this agent, and how hard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InboundEdge {
    pub source: AgentIdx,
    pub weight: f32,
}

/// Directed influence graph stored as per-target inbound adjacency.
#[derive(Debug, Clone)]
pub struct InfluenceGraph {
    topology: Topology,
    inbound: Vec<Vec<InboundEdge>>,
}

impl InfluenceGraph {
    /// Builds the graph for the given population and topology.
    ///
    /// Edge generation consumes the RNG in agent-index order, so the same
    /// population and seed always produce the same graph. Populations of
    /// fewer than two agents produce a valid graph with no edges.
    pub fn build(
        agents: &[AgentGenome],
        topology: Topology,
        tuning: &GraphTuning,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut graph = Self {
            topology,
            inbound: vec![Vec::new(); agents.len()],
        };
        if agents.len() >= 2 {
            match topology {
                Topology::EchoChamber => graph.build_echo_chamber(agents, tuning, rng),
                Topology::LooseNetwork => graph.build_loose_network(agents, tuning, rng),
                Topology::RealFollower => graph.build_real_follower(agents, tuning, rng),
            }
        }
        debug!(
            topology = %topology,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built influence graph"
        );
        graph
    }

    /// Dense edges inside each agent-type cluster, sparse edges across.
    fn build_echo_chamber(
        &mut self,
        agents: &[AgentGenome],
        tuning: &GraphTuning,
        rng: &mut ChaCha8Rng,
    ) {
        for source in 0..agents.len() {
            for target in 0..agents.len() {
                if source == target {
                    continue;
                }
                let same_cluster = agents[source].agent_type == agents[target].agent_type;
                let (prob, lo, hi) = if same_cluster {
                    (
                        tuning.echo_intra_edge_prob,
                        tuning.echo_intra_weight_min,
                        tuning.echo_intra_weight_max,
                    )
                } else {
                    (
                        tuning.echo_inter_edge_prob,
                        tuning.echo_inter_weight_min,
                        tuning.echo_inter_weight_max,
                    )
                };
                if rng.gen_bool(prob as f64) {
                    let base = sample_weight(rng, lo, hi);
                    self.connect(source, target, base, agents, tuning);
                }
            }
        }
    }

    /// Every ordered pair gets an edge with one flat probability.
    fn build_loose_network(
        &mut self,
        agents: &[AgentGenome],
        tuning: &GraphTuning,
        rng: &mut ChaCha8Rng,
    ) {
        for source in 0..agents.len() {
            for target in 0..agents.len() {
                if source == target {
                    continue;
                }
                if rng.gen_bool(tuning.loose_edge_prob as f64) {
                    let base = sample_weight(rng, tuning.loose_weight_min, tuning.loose_weight_max);
                    self.connect(source, target, base, agents, tuning);
                }
            }
        }
    }

    /// The highest-influence agents become hubs; every other agent follows
    /// a handful of them. Edge weight scales with the hub's influence, so
    /// a post by a big account lands harder on its followers.
    fn build_real_follower(
        &mut self,
        agents: &[AgentGenome],
        tuning: &GraphTuning,
        rng: &mut ChaCha8Rng,
    ) {
        let mut by_influence: Vec<usize> = (0..agents.len()).collect();
        by_influence.sort_by(|&a, &b| {
            agents[b]
                .influence_score
                .partial_cmp(&agents[a].influence_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let hub_count = ((agents.len() as f32 * tuning.hub_fraction).ceil() as usize).max(1);
        let hubs = &by_influence[..hub_count.min(agents.len())];

        for target in 0..agents.len() {
            if hubs.contains(&target) {
                continue;
            }
            let want = rng
                .gen_range(tuning.follower_min_sources..=tuning.follower_max_sources)
                as usize;
            let mut sources: Vec<usize> = hubs
                .choose_multiple(rng, want.min(hubs.len()))
                .copied()
                .collect();
            sources.sort_unstable();

            for source in sources {
                let scale = sample_weight(
                    rng,
                    tuning.follower_weight_scale_min,
                    tuning.follower_weight_scale_max,
                );
                let base = agents[source].influence_score * scale;
                self.connect(source, target, base, agents, tuning);
            }
        }
    }

    fn connect(
        &mut self,
        source: usize,
        target: usize,
        base: f32,
        agents: &[AgentGenome],
        tuning: &GraphTuning,
    ) {
        let affinity = agents[source].trait_affinity(&agents[target]);
        let weight =
            (base + tuning.trait_affinity_weight * affinity).clamp(tuning.min_edge_weight, 1.0);
        self.inbound[target].push(InboundEdge {
            source: AgentIdx(source as u32),
            weight,
        });
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Inbound edges of one agent, in source-index order for the echo and
    /// follower builders.
    pub fn inbound(&self, agent: AgentIdx) -> &[InboundEdge] {
        &self.inbound[agent.index()]
    }

    pub fn node_count(&self) -> usize {
        self.inbound.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inbound.iter().map(Vec::len).sum()
    }

    /// Flattens the graph for the outcome record, edges listed per target
    /// in index order.
    pub fn snapshot(&self, agents: &[AgentGenome]) -> GraphSnapshot {
        let node_ids = agents.iter().map(|a| a.id.clone()).collect();
        let mut edges = Vec::with_capacity(self.edge_count());
        for (target, inbound) in self.inbound.iter().enumerate() {
            for edge in inbound {
                edges.push(EdgeSnapshot {
                    source: agents[edge.source.index()].id.clone(),
                    target: agents[target].id.clone(),
                    weight: edge.weight,
                });
            }
        }
        GraphSnapshot {
            topology: self.topology,
            node_ids,
            edges,
        }
    }

    /// Test constructor building a graph from explicit (source, target,
    /// weight) triples.
    #[cfg(test)]
    pub fn from_edges(topology: Topology, node_count: usize, edges: &[(u32, u32, f32)]) -> Self {
        let mut inbound = vec![Vec::new(); node_count];
        for &(source, target, weight) in edges {
            inbound[target as usize].push(InboundEdge {
                source: AgentIdx(source),
                weight,
            });
        }
        Self { topology, inbound }
    }
}

/// Uniform draw that tolerates a degenerate range; hi <= lo yields lo.
fn sample_weight(rng: &mut ChaCha8Rng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..hi)
    }
}
