//! Feature Signal Extraction
//!
//! Scores each brief feature on three axes before the first round runs:
//! novelty, cost pressure and competitor angle. The scores come from a
//! keyword scan over the feature title and description; agents then weigh
//! them against their own psychographics when choosing what to post about.

use arena_report::{Brief, FeatureSignals};

/// Words that make a feature read as new or technology-forward.
const NOVELTY_KEYWORDS: &[&str] = &[
    "ai",
    "smart",
    "new",
    "automatic",
    "instant",
    "realtime",
    "real-time",
    "predictive",
    "next-gen",
    "innovative",
    "breakthrough",
    "cutting-edge",
];

/// Words that imply the buyer pays more.
const COST_KEYWORDS: &[&str] = &[
    "premium",
    "price",
    "pricing",
    "subscription",
    "fee",
    "paid",
    "upgrade",
    "tier",
    "cost",
    "expensive",
    "enterprise",
];

/// Words that invite a comparison with rival products.
const COMPETITOR_KEYWORDS: &[&str] = &[
    "alternative",
    "competitor",
    "switch",
    "versus",
    "vs",
    "replace",
    "migration",
    "compared",
    "leader",
    "industry-first",
];

/// Floor values for features whose text matches nothing.
mod baseline {
    pub const NOVELTY: f32 = 0.3;
    pub const COST_PRESSURE: f32 = 0.2;
    pub const COMPETITOR_ANGLE: f32 = 0.1;
}

/// Each distinct keyword hit raises its axis by this much.
const HIT_INCREMENT: f32 = 0.15;

/// Scores every feature of a brief, in feature order.
pub fn extract_feature_signals(brief: &Brief) -> Vec<FeatureSignals> {
    brief
        .features
        .iter()
        .map(|feature| score_text(&feature.full_text()))
        .collect()
}

fn score_text(text: &str) -> FeatureSignals {
    let words = tokenize(text);
    FeatureSignals::new(
        baseline::NOVELTY + HIT_INCREMENT * count_hits(&words, NOVELTY_KEYWORDS) as f32,
        baseline::COST_PRESSURE + HIT_INCREMENT * count_hits(&words, COST_KEYWORDS) as f32,
        baseline::COMPETITOR_ANGLE + HIT_INCREMENT * count_hits(&words, COMPETITOR_KEYWORDS) as f32,
    )
}

/// Counts keywords that appear at least once; repeats of the same word do
/// not stack, so a feature cannot spike an axis by repeating one term.
fn count_hits(words: &[String], keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| words.iter().any(|word| word == *keyword))
        .count()
}

/// Lowercases and splits on anything that is not alphanumeric or a hyphen,
/// keeping hyphenated terms like "real-time" intact.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|word| !word.is_empty())
        .map(|word| word.trim_matches('-').to_string())
        .filter(|word| !word.is_empty())
        .collect()
}
