//! Configuration loading for the Analyst.
//!
//! All scoring policy lives in a TOML configuration file: the adoption
//! blend, metric caps and objection ranking cutoffs. Every section is
//! optional; absent fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete Analyst configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Adoption score blend weights
    #[serde(default)]
    pub adoption: AdoptionWeights,
    /// Metric caps and sentinels
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Objection ranking settings
    #[serde(default)]
    pub objections: ObjectionConfig,
    /// Insight generation settings
    #[serde(default)]
    pub insights: InsightConfig,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            adoption: AdoptionWeights::default(),
            metrics: MetricsConfig::default(),
            objections: ObjectionConfig::default(),
            insights: InsightConfig::default(),
        }
    }
}

impl AnalystConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::TomlError)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        toml::to_string_pretty(self).map_err(TomlSerializeError)
    }
}

/// Weights for the adoption score blend.
///
/// The score is `100 x clamp01(baseline + advocacy x advocate_share +
/// engagement x density - polarization_penalty x polarization)`. An empty
/// history therefore lands exactly on `100 x baseline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdoptionWeights {
    /// Score floor before any evidence, as a fraction of 100
    pub baseline: f32,
    /// Weight on the advocate share of expressed stances
    pub advocacy: f32,
    /// Weight on engagement density
    pub engagement: f32,
    /// Penalty weight on the polarization score
    pub polarization_penalty: f32,
}

impl Default for AdoptionWeights {
    fn default() -> Self {
        Self {
            baseline: 0.5,
            advocacy: 0.35,
            engagement: 0.25,
            polarization_penalty: 0.30,
        }
    }
}

/// Metric caps and sentinels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Ceiling for the advocate-to-saboteur ratio when saboteurs are absent
    pub ratio_cap: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { ratio_cap: 100.0 }
    }
}

/// Objection ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectionConfig {
    /// Maximum objections surfaced in `top_objections`
    pub max_objections: usize,
    /// Peak influence above which an objection is must-fix
    pub must_fix_influence: f32,
    /// Distinct rounds at or above which an objection is must-fix
    pub must_fix_rounds: u32,
}

impl Default for ObjectionConfig {
    fn default() -> Self {
        Self {
            max_objections: 5,
            must_fix_influence: 0.7,
            must_fix_rounds: 2,
        }
    }
}

/// Insight generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Maximum lines in `quick_insights`
    pub max_insights: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self { max_insights: 4 }
    }
}

/// Errors that can occur loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file
    IoError(std::io::Error),
    /// Error parsing TOML config
    TomlError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::TomlError(e) => Some(e),
        }
    }
}

/// Error that can occur during TOML serialization.
#[derive(Debug)]
pub struct TomlSerializeError(pub toml::ser::Error);

impl std::fmt::Display for TomlSerializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TOML serialize error: {}", self.0)
    }
}

impl std::error::Error for TomlSerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Analyst Configuration

[adoption]
baseline = 0.5
advocacy = 0.35
engagement = 0.25
polarization_penalty = 0.30

[metrics]
ratio_cap = 100.0

[objections]
max_objections = 5
must_fix_influence = 0.7
must_fix_rounds = 2

[insights]
max_insights = 4
"#
    .to_string()
}
