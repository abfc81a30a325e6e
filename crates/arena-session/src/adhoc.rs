//! Ad-hoc Analysis Input
//!
//! Turns a loose snippet of text into a throwaway brief so a single
//! reaction run can be fired without creating a session first. The
//! slicing is deliberately crude: sentence fragments become pseudo
//! features and the opening words become the product name.

use arena_report::{Brief, Feature, PopulationConfig, Topology};

/// Agents in every ad-hoc arena.
pub const AD_HOC_POPULATION: u32 = 12;

/// Rounds in every ad-hoc arena.
pub const AD_HOC_ROUNDS: u32 = 2;

const MAX_FEATURES: usize = 5;
const TITLE_CHARS: usize = 60;
const NAME_WORDS: usize = 5;

/// Fragments shorter than this are punctuation noise, not features.
const MIN_FRAGMENT_CHARS: usize = 3;

/// Population configuration used for every ad-hoc run: a small loose
/// network with the default agent mix and a fresh seed.
pub fn ad_hoc_config() -> PopulationConfig {
    PopulationConfig {
        population_size: AD_HOC_POPULATION,
        rounds: AD_HOC_ROUNDS,
        topology: Topology::LooseNetwork,
        ..PopulationConfig::default()
    }
}

/// Slices free text into a brief.
///
/// Fragments are cut at sentence punctuation and newlines, trimmed, and
/// capped at [`MAX_FEATURES`]; each becomes a feature whose title is the
/// fragment's first [`TITLE_CHARS`] characters and whose description is
/// the full fragment. Text with no usable fragment falls back to a single
/// feature spanning the whole input. Blank input produces a brief that
/// fails validation at the call site.
pub fn brief_from_text(text: &str) -> Brief {
    let trimmed = text.trim();
    let product_name = trimmed
        .split_whitespace()
        .take(NAME_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    let fragments: Vec<&str> = trimmed
        .split(['.', '!', '?', ';', '\n'])
        .map(str::trim)
        .filter(|fragment| fragment.len() >= MIN_FRAGMENT_CHARS)
        .take(MAX_FEATURES)
        .collect();

    let features = if fragments.is_empty() {
        vec![Feature::new(title_of(trimmed), trimmed)]
    } else {
        fragments
            .into_iter()
            .map(|fragment| Feature::new(title_of(fragment), fragment))
            .collect()
    };

    Brief::new(product_name, features)
}

fn title_of(fragment: &str) -> String {
    fragment.chars().take(TITLE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_become_features() {
        let brief = brief_from_text(
            "Orbit Notes captures ideas instantly. Sync runs across every device. \
             Search understands natural language.",
        );

        assert!(brief.validate().is_ok());
        assert_eq!(brief.product_name, "Orbit Notes captures ideas instantly.");
        assert_eq!(brief.feature_count(), 3);
        assert_eq!(brief.features[0].title, "Orbit Notes captures ideas instantly");
        assert_eq!(brief.features[1].title, "Sync runs across every device");
    }

    #[test]
    fn test_newlines_split_like_sentences() {
        let brief = brief_from_text("Fast capture\nOffline first\nShared folders");

        assert_eq!(brief.feature_count(), 3);
        assert_eq!(brief.features[2].title, "Shared folders");
    }

    #[test]
    fn test_feature_count_is_capped() {
        let brief = brief_from_text("One. Two plus. Three plus. Four plus. Five plus. Six plus. Seven plus.");

        assert_eq!(brief.feature_count(), MAX_FEATURES);
    }

    #[test]
    fn test_long_fragment_title_is_truncated() {
        let long = "a".repeat(200);
        let brief = brief_from_text(&long);

        assert_eq!(brief.features[0].title.chars().count(), TITLE_CHARS);
        assert_eq!(brief.features[0].description, long);
    }

    #[test]
    fn test_punctuation_noise_is_dropped() {
        let brief = brief_from_text("Quick capture for busy people. a. b!");

        assert_eq!(brief.feature_count(), 1);
        assert_eq!(brief.features[0].title, "Quick capture for busy people");
    }

    #[test]
    fn test_text_without_punctuation_is_one_feature() {
        let brief = brief_from_text("A rugged field recorder for botanists");

        assert_eq!(brief.feature_count(), 1);
        assert_eq!(brief.product_name, "A rugged field recorder for");
    }

    #[test]
    fn test_blank_text_fails_validation() {
        let brief = brief_from_text("   ");
        assert!(brief.validate().is_err());
    }

    #[test]
    fn test_ad_hoc_config_shape() {
        let config = ad_hoc_config();

        assert_eq!(config.population_size, AD_HOC_POPULATION);
        assert_eq!(config.rounds, AD_HOC_ROUNDS);
        assert_eq!(config.topology, Topology::LooseNetwork);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }
}
