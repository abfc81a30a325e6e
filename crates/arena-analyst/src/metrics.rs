//! Arena Health Metrics
//!
//! Pure computations over a finished run's history:
//! - Polarization (how split the expressed stances are)
//! - Advocate-to-saboteur ratio (with a capped sentinel for zero saboteurs)
//! - Viral path length (how far reactions travel through the graph)
//! - Engagement density (interactions per agent per round)
//! - The adoption score blending all of the above

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;

use arena_report::{ArenaHealth, GraphSnapshot, SimulationOutcome, StanceCounts};

use crate::config::{AdoptionWeights, MetricsConfig};

/// Computes the full metric block for a finished run.
pub fn compute_health(outcome: &SimulationOutcome, config: &MetricsConfig) -> ArenaHealth {
    let counts = outcome.stance_counts();
    ArenaHealth {
        polarization_score: polarization_score(&counts),
        advocate_to_saboteur_ratio: advocate_to_saboteur_ratio(&counts, config.ratio_cap),
        viral_path_length: viral_path_length(outcome),
        engagement_density: engagement_density(outcome),
    }
}

/// Stance bimodality in [0, 1].
///
/// extremity is the share of interactions that took a side; balance is 1
/// when advocates and saboteurs are even and 0 when one side holds the
/// floor alone. One-sided consensus therefore scores near 0 even when
/// everyone is shouting.
pub fn polarization_score(counts: &StanceCounts) -> f32 {
    let total = counts.total();
    let expressed = counts.expressed();
    if total == 0 || expressed == 0 {
        return 0.0;
    }

    let extremity = expressed as f32 / total as f32;
    let spread = counts.advocates.abs_diff(counts.saboteurs) as f32;
    let balance = 1.0 - spread / expressed as f32;
    extremity * balance
}

/// Advocates per saboteur, with sentinels instead of division by zero:
/// no stances at all reads 0, advocates without any saboteur read as the
/// advocate count capped at `cap`.
pub fn advocate_to_saboteur_ratio(counts: &StanceCounts, cap: f32) -> f32 {
    if counts.saboteurs > 0 {
        return counts.advocates as f32 / counts.saboteurs as f32;
    }
    if counts.advocates == 0 {
        warn!("no expressed stances; reporting zero advocate ratio");
        return 0.0;
    }
    (counts.advocates as f32).min(cap)
}

/// Interactions per agent per round actually run; 0 for a zero-round run.
pub fn engagement_density(outcome: &SimulationOutcome) -> f32 {
    if outcome.rounds_run == 0 || outcome.population_size == 0 {
        return 0.0;
    }
    let slots = outcome.population_size as f32 * outcome.rounds_run as f32;
    outcome.total_interactions() as f32 / slots
}

/// Mean graph distance from each interaction's actor to the distinct agents
/// who acted on the same feature in later rounds.
///
/// Distance follows influence direction, the same direction propagation
/// travels. Unreachable pairs and self-echoes are excluded; a history with
/// no qualifying pairs reads 0.
pub fn viral_path_length(outcome: &SimulationOutcome) -> f32 {
    let node_index: HashMap<&str, usize> = outcome
        .graph
        .node_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    // (round, actor) pairs per feature, in history order
    let mut actors_by_feature: HashMap<usize, Vec<(u32, usize)>> = HashMap::new();
    for round in &outcome.rounds {
        for interaction in &round.interactions {
            let Some(&actor) = node_index.get(interaction.agent_id.as_str()) else {
                continue;
            };
            actors_by_feature
                .entry(interaction.feature_index)
                .or_default()
                .push((round.index, actor));
        }
    }

    let adjacency = outbound_adjacency(&outcome.graph, &node_index);
    let mut distance_cache: HashMap<usize, Vec<Option<u32>>> = HashMap::new();

    let mut total_hops = 0u64;
    let mut pairs = 0u64;
    for entries in actors_by_feature.values() {
        for (i, &(round, source)) in entries.iter().enumerate() {
            let later: HashSet<usize> = entries[i..]
                .iter()
                .filter(|(r, actor)| *r > round && *actor != source)
                .map(|&(_, actor)| actor)
                .collect();
            if later.is_empty() {
                continue;
            }

            let distances = distance_cache
                .entry(source)
                .or_insert_with(|| bfs_distances(source, &adjacency));
            for follower in later {
                if let Some(hops) = distances[follower] {
                    total_hops += hops as u64;
                    pairs += 1;
                }
            }
        }
    }

    if pairs == 0 {
        0.0
    } else {
        total_hops as f32 / pairs as f32
    }
}

/// Bounded blend of advocacy, engagement and a polarization penalty,
/// clamped into [0, 100]. An empty history lands on the baseline.
pub fn adoption_score(
    outcome: &SimulationOutcome,
    health: &ArenaHealth,
    weights: &AdoptionWeights,
) -> f32 {
    let counts = outcome.stance_counts();
    let total = counts.total();
    let advocate_share = if total == 0 {
        0.0
    } else {
        counts.advocates as f32 / total as f32
    };

    let blended = weights.baseline
        + weights.advocacy * advocate_share
        + weights.engagement * health.engagement_density
        - weights.polarization_penalty * health.polarization_score;
    100.0 * blended.clamp(0.0, 1.0)
}

fn outbound_adjacency(
    graph: &GraphSnapshot,
    node_index: &HashMap<&str, usize>,
) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); graph.node_count()];
    for edge in &graph.edges {
        if let (Some(&source), Some(&target)) = (
            node_index.get(edge.source.as_str()),
            node_index.get(edge.target.as_str()),
        ) {
            adjacency[source].push(target);
        }
    }
    adjacency
}

/// Hop counts from one node to every other, `None` where unreachable.
fn bfs_distances(from: usize, adjacency: &[Vec<usize>]) -> Vec<Option<u32>> {
    let mut distances = vec![None; adjacency.len()];
    distances[from] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(current) = queue.pop_front() {
        let next_hop = match distances[current] {
            Some(d) => d + 1,
            None => continue,
        };
        for &neighbor in &adjacency[current] {
            if distances[neighbor].is_none() {
                distances[neighbor] = Some(next_hop);
                queue.push_back(neighbor);
            }
        }
    }
    distances
}
