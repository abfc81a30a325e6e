//! Quick Insight Generation
//!
//! Short, template-phrased observations for the top of the report. Each
//! line states one fact pulled from the history; the list is ordered most
//! load-bearing first and capped by configuration.

use std::collections::HashMap;

use arena_report::{AgentType, ArenaHealth, Brief, SimulationOutcome, Stance, Termination};

use crate::config::InsightConfig;

/// Polarization above this level earns its own line.
const POLARIZATION_CALLOUT: f32 = 0.6;

/// Builds the `quick_insights` list for a finished run.
pub fn quick_insights(
    brief: &Brief,
    outcome: &SimulationOutcome,
    health: &ArenaHealth,
    config: &InsightConfig,
) -> Vec<String> {
    let counts = outcome.stance_counts();
    if counts.total() == 0 {
        return vec!["No agent spent tokens; the brief drew no reaction".to_string()];
    }

    let mut insights = Vec::new();

    insights.push(sentiment_line(
        counts.advocates,
        counts.saboteurs,
        counts.total(),
    ));

    if let Some(line) = strongest_support_line(brief, outcome) {
        insights.push(line);
    }
    if let Some(line) = pushback_source_line(outcome) {
        insights.push(line);
    }
    if health.polarization_score > POLARIZATION_CALLOUT {
        insights.push(format!(
            "High polarization ({:.2}): the arena split into camps",
            health.polarization_score
        ));
    }
    if outcome.termination == Termination::TokensExhausted {
        insights.push(format!(
            "Attention ran out after {} of {} rounds",
            outcome.rounds_run, outcome.rounds_requested
        ));
    }

    insights.truncate(config.max_insights);
    insights
}

fn sentiment_line(advocates: u32, saboteurs: u32, total: u32) -> String {
    if advocates > saboteurs {
        format!(
            "Advocates outnumbered saboteurs {} to {} across {} posts",
            advocates, saboteurs, total
        )
    } else if saboteurs > advocates {
        format!(
            "Saboteurs outnumbered advocates {} to {} across {} posts",
            saboteurs, advocates, total
        )
    } else {
        format!(
            "The arena split evenly, {} advocates to {} saboteurs across {} posts",
            advocates, saboteurs, total
        )
    }
}

/// The feature with the most advocate posts, ties to the earlier feature.
fn strongest_support_line(brief: &Brief, outcome: &SimulationOutcome) -> Option<String> {
    let mut advocate_counts: HashMap<usize, u32> = HashMap::new();
    for round in &outcome.rounds {
        for interaction in &round.interactions {
            if interaction.stance == Stance::Advocate {
                *advocate_counts.entry(interaction.feature_index).or_default() += 1;
            }
        }
    }

    let (&feature_index, &count) = advocate_counts
        .iter()
        .max_by_key(|(&index, &count)| (count, std::cmp::Reverse(index)))?;
    let feature = brief.feature(feature_index)?;
    Some(format!(
        "\"{}\" drew the strongest support ({} advocate posts)",
        feature.title, count
    ))
}

/// The agent type behind most saboteur posts, ties to the earlier type in
/// arena order.
fn pushback_source_line(outcome: &SimulationOutcome) -> Option<String> {
    let mut saboteur_counts: HashMap<AgentType, u32> = HashMap::new();
    for round in &outcome.rounds {
        for interaction in &round.interactions {
            if interaction.stance == Stance::Saboteur {
                *saboteur_counts.entry(interaction.agent_type).or_default() += 1;
            }
        }
    }

    let mut loudest: Option<(AgentType, u32)> = None;
    for &agent_type in AgentType::all() {
        let count = saboteur_counts.get(&agent_type).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        match loudest {
            Some((_, best)) if best >= count => {}
            _ => loudest = Some((agent_type, count)),
        }
    }

    let (loudest, _) = loudest?;
    Some(format!("Most pushback came from {} agents", loudest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_report::fixtures::{empty_outcome, sample_brief, sample_outcome};
    use arena_report::ArenaHealth;

    fn fixture_health() -> ArenaHealth {
        ArenaHealth {
            polarization_score: 0.75,
            advocate_to_saboteur_ratio: 4.0 / 3.0,
            viral_path_length: 1.0,
            engagement_density: 0.8,
        }
    }

    #[test]
    fn test_empty_history_single_line() {
        let insights = quick_insights(
            &sample_brief(),
            &empty_outcome(),
            &ArenaHealth::zeroed(),
            &InsightConfig::default(),
        );
        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("no reaction"));
    }

    #[test]
    fn test_fixture_insights_lead_with_sentiment() {
        let insights = quick_insights(
            &sample_brief(),
            &sample_outcome(),
            &fixture_health(),
            &InsightConfig::default(),
        );

        assert_eq!(
            insights[0],
            "Advocates outnumbered saboteurs 4 to 3 across 8 posts"
        );
    }

    #[test]
    fn test_fixture_names_strongest_feature() {
        let insights = quick_insights(
            &sample_brief(),
            &sample_outcome(),
            &fixture_health(),
            &InsightConfig::default(),
        );

        // feature 0 took all four advocate posts
        assert!(insights[1].contains("Smart capture"));
        assert!(insights[1].contains("4 advocate posts"));
    }

    #[test]
    fn test_fixture_names_pushback_type() {
        let insights = quick_insights(
            &sample_brief(),
            &sample_outcome(),
            &fixture_health(),
            &InsightConfig::default(),
        );

        assert!(insights[2].contains("competitor agents"));
    }

    #[test]
    fn test_polarization_callout_and_cap() {
        let insights = quick_insights(
            &sample_brief(),
            &sample_outcome(),
            &fixture_health(),
            &InsightConfig::default(),
        );

        assert_eq!(insights.len(), 4);
        assert!(insights[3].contains("High polarization"));

        let capped = quick_insights(
            &sample_brief(),
            &sample_outcome(),
            &fixture_health(),
            &InsightConfig { max_insights: 2 },
        );
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn test_exhaustion_line() {
        let mut outcome = sample_outcome();
        outcome.termination = arena_report::Termination::TokensExhausted;
        outcome.rounds_requested = 5;

        let insights = quick_insights(
            &sample_brief(),
            &outcome,
            &ArenaHealth::zeroed(),
            &InsightConfig { max_insights: 8 },
        );
        assert!(insights
            .iter()
            .any(|line| line.contains("Attention ran out after 2 of 5 rounds")));
    }

    #[test]
    fn test_even_split_wording() {
        assert!(sentiment_line(3, 3, 9).contains("split evenly"));
    }
}
