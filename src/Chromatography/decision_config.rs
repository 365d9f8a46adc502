//! # Decision Configuration
//!
//! Thresholds used by the chromatography decision rules. Defaults follow common
//! analytical practice; any of them can be overridden from a JSON file or from the
//! `SETTINGS` section of a task file.
//!
//! | field | default | meaning |
//! |-------|---------|---------|
//! | `volatility_threshold_c` | 300.0 | boiling point (°C) below which GC is viable |
//! | `ionizable_band` | (2.0, 12.0) | pKa window counted as markedly ionizable |
//! | `ph_offset` | 2.0 | pH units between the suggested pH and the pKa |
//! | `separation_goal` | `SuppressIonization` | which side of the pKa the pH goes to |
//! | `polar_logp_cutoff` | 1.0 | mean logP below which the mixture counts as polar |
//! | `size_exclusion_mw` | 2000.0 | molecular weight (g/mol) above which SEC is advised |
//!
//! ## Configuration Format
//! ```json
//! {
//!   "volatility_threshold_c": 250.0,
//!   "ionizable_band": [3.0, 11.0],
//!   "separation_goal": "ExploitIonization"
//! }
//! ```
//! Missing fields take their defaults.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Whether the suggested pH should keep ionizable compounds neutral or charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeparationGoal {
    /// pH on the far side of the pKa from neutral: compounds stay un-ionized
    #[default]
    SuppressIonization,
    /// pH on the neutral side of the pKa: compounds are ionized (ion exchange)
    ExploitIonization,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub volatility_threshold_c: f64,
    pub ionizable_band: (f64, f64),
    pub ph_offset: f64,
    pub separation_goal: SeparationGoal,
    pub polar_logp_cutoff: f64,
    pub size_exclusion_mw: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            volatility_threshold_c: 300.0,
            ionizable_band: (2.0, 12.0),
            ph_offset: 2.0,
            separation_goal: SeparationGoal::SuppressIonization,
            polar_logp_cutoff: 1.0,
            size_exclusion_mw: 2000.0,
        }
    }
}

impl DecisionConfig {
    /// Loads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DecisionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.volatility_threshold_c.is_finite() && self.volatility_threshold_c > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "volatility threshold must be a positive temperature, got {}",
                self.volatility_threshold_c
            )));
        }
        let (low, high) = self.ionizable_band;
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(ConfigError::Invalid(format!(
                "ionizable band must be an ordered pKa interval, got ({}, {})",
                low, high
            )));
        }
        if !(self.ph_offset > 0.0 && self.ph_offset <= 7.0) {
            return Err(ConfigError::Invalid(format!(
                "pH offset must lie in (0, 7], got {}",
                self.ph_offset
            )));
        }
        if !self.polar_logp_cutoff.is_finite() {
            return Err(ConfigError::Invalid(
                "polar logP cutoff must be finite".to_string(),
            ));
        }
        if !(self.size_exclusion_mw.is_finite() && self.size_exclusion_mw > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "size exclusion molecular weight must be positive, got {}",
                self.size_exclusion_mw
            )));
        }
        Ok(())
    }
}
