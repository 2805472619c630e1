//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::ConfigError;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI: bounded run, one shared environment per method
    ///
    /// - Table: per method
    /// - Static fields: not resolved
    /// - Limits: 10k iterations, 100k path edges
    Fast,

    /// Development: call-site sensitive with a generous iteration cap
    ///
    /// - Table: per call site
    /// - Static fields: resolved, static initializer required
    /// - Limits: 1M iterations
    #[default]
    Balanced,

    /// Audit: runs to the fixed point, refuses partial results
    ///
    /// - Table: per call site
    /// - Static fields: resolved, static initializer required
    /// - Limits: none, `fail_on_limit` set
    Thorough,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}
