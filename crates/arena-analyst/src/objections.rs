//! Objection Extraction
//!
//! Folds saboteur interactions into per-feature objections, phrases each
//! one from the feature's dominant signal angle, and ranks them by how
//! loud and how credible the pushback was.

use std::collections::HashSet;

use arena_report::{Brief, FeatureSignals, Objection, SimulationOutcome, Stance};

use crate::config::ObjectionConfig;

/// Builds the full ranked objection list for a run.
///
/// One objection per feature that drew at least one saboteur. Ranking is
/// frequency first, then peak influence, then brief feature order.
pub fn collect_objections(brief: &Brief, outcome: &SimulationOutcome) -> Vec<Objection> {
    let mut per_feature: Vec<Option<ObjectionDraft>> = vec![None; brief.feature_count()];

    for round in &outcome.rounds {
        for interaction in &round.interactions {
            if interaction.stance != Stance::Saboteur {
                continue;
            }
            let Some(slot) = per_feature.get_mut(interaction.feature_index) else {
                continue;
            };
            let draft = slot.get_or_insert_with(ObjectionDraft::default);
            draft.frequency += 1;
            draft.peak_influence = draft.peak_influence.max(interaction.influence_score);
            draft.rounds.insert(round.index);
        }
    }

    let mut objections: Vec<(usize, Objection)> = per_feature
        .into_iter()
        .enumerate()
        .filter_map(|(index, draft)| {
            let draft = draft?;
            let title = brief
                .feature(index)
                .map(|f| f.title.clone())
                .unwrap_or_else(|| format!("feature {}", index));
            let message = objection_message(&title, outcome.feature_signals.get(index));
            Some((
                index,
                Objection {
                    feature_title: title,
                    message,
                    frequency: draft.frequency,
                    peak_influence: draft.peak_influence,
                    rounds_seen: draft.rounds.len() as u32,
                },
            ))
        })
        .collect();

    objections.sort_by(|(index_a, a), (index_b, b)| {
        b.frequency
            .cmp(&a.frequency)
            .then(
                b.peak_influence
                    .partial_cmp(&a.peak_influence)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(index_a.cmp(index_b))
    });
    objections.into_iter().map(|(_, objection)| objection).collect()
}

/// The head of the ranked list, capped for the report.
pub fn top_objections(ranked: &[Objection], config: &ObjectionConfig) -> Vec<Objection> {
    ranked.iter().take(config.max_objections).cloned().collect()
}

/// Objections serious enough to block a launch: pushed by a high-influence
/// agent, or persistent across rounds.
pub fn must_fix(ranked: &[Objection], config: &ObjectionConfig) -> Vec<Objection> {
    ranked
        .iter()
        .filter(|objection| {
            objection.peak_influence > config.must_fix_influence
                || objection.rounds_seen >= config.must_fix_rounds
        })
        .cloned()
        .collect()
}

#[derive(Default, Clone)]
struct ObjectionDraft {
    frequency: u32,
    peak_influence: f32,
    rounds: HashSet<u32>,
}

/// Phrases the objection from the feature's loudest signal axis.
fn objection_message(title: &str, signals: Option<&FeatureSignals>) -> String {
    let Some(signals) = signals else {
        return format!("\"{}\" drew sustained pushback", title);
    };
    if signals.cost_pressure >= signals.competitor_angle && signals.cost_pressure >= signals.novelty
    {
        format!("\"{}\" reads as a paid upsell and drew pricing backlash", title)
    } else if signals.competitor_angle >= signals.novelty {
        format!(
            "\"{}\" invites direct comparison with rivals and lost the exchange",
            title
        )
    } else {
        format!("\"{}\" is not landing as a believable improvement", title)
    }
}
