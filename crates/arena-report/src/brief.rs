//! Product Brief Types
//!
//! The brief is the input under evaluation: a product name plus an ordered
//! feature list. Interactions reference features by index into that list, so
//! the order is part of the data contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single product feature under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

impl Feature {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Title and description joined for text analysis.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// The product brief driving a simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    pub product_name: String,
    /// Ordered feature list; interactions reference features by index.
    pub features: Vec<Feature>,
}

impl Brief {
    pub fn new(product_name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self {
            product_name: product_name.into(),
            features,
        }
    }

    /// Checks the brief is usable: non-empty product name, at least one
    /// feature, and no feature with a blank title.
    pub fn validate(&self) -> Result<(), InvalidBrief> {
        if self.product_name.trim().is_empty() {
            return Err(InvalidBrief::EmptyProductName);
        }
        if self.features.is_empty() {
            return Err(InvalidBrief::NoFeatures);
        }
        for (index, feature) in self.features.iter().enumerate() {
            if feature.title.trim().is_empty() {
                return Err(InvalidBrief::BlankFeatureTitle(index));
            }
        }
        Ok(())
    }

    pub fn feature(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// Why a brief was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidBrief {
    EmptyProductName,
    NoFeatures,
    BlankFeatureTitle(usize),
}

impl fmt::Display for InvalidBrief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidBrief::EmptyProductName => write!(f, "brief has an empty product name"),
            InvalidBrief::NoFeatures => write!(f, "brief has no features"),
            InvalidBrief::BlankFeatureTitle(index) => {
                write!(f, "feature {} has a blank title", index)
            }
        }
    }
}

impl std::error::Error for InvalidBrief {}

/// Precomputed text signals for one feature, each in [0, 1].
///
/// Derived once from the feature's title and description before the first
/// round. The round loop only reads these numbers; it never inspects brief
/// text itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSignals {
    /// How novel or technology-forward the feature reads.
    pub novelty: f32,
    /// How strongly the text implies added cost for the buyer.
    pub cost_pressure: f32,
    /// How much the text invites comparison with competing products.
    pub competitor_angle: f32,
}

impl FeatureSignals {
    /// Creates a signal set, clamping every component into [0, 1].
    pub fn new(novelty: f32, cost_pressure: f32, competitor_angle: f32) -> Self {
        Self {
            novelty: novelty.clamp(0.0, 1.0),
            cost_pressure: cost_pressure.clamp(0.0, 1.0),
            competitor_angle: competitor_angle.clamp(0.0, 1.0),
        }
    }
}
