// src/config.rs
//
// Engine configuration.
//
// Every field has a default, so a config file only needs the values it
// changes.

use std::path::Path;

use serde::Deserialize;

use crate::catalog::DEFAULT_DURATION_MS;
use crate::state::Spacing;

/// Error loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the sound bank, tape and playback engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MixtapeConfig {
    /// Sample rate for synthesized sounds (Hz).
    pub sample_rate: f64,

    /// Gap between events in sequential mode (ms).
    pub sequential_gap_ms: u64,

    /// Gap between events in layer mode (ms).
    pub layered_gap_ms: u64,

    /// Duration assumed for sounds without a buffer (ms).
    pub default_duration_ms: u64,

    /// Extra time after the last sound before a run counts as finished (ms).
    pub tail_ms: u64,

    /// How long the impact pulse stays up after a trigger (ms).
    pub impact_decay_ms: u64,

    /// Seed for the synthesizer's noise.
    pub synth_seed: u64,
}

impl Default for MixtapeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            sequential_gap_ms: 200,
            layered_gap_ms: 300,
            default_duration_ms: DEFAULT_DURATION_MS,
            tail_ms: 500,
            impact_decay_ms: 300,
            synth_seed: 0x5A4_0B0A4D,
        }
    }
}

impl MixtapeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate >= 1_000.0) {
            return Err(ConfigError::Invalid(format!(
                "sample_rate must be at least 1000 Hz, got {}",
                self.sample_rate
            )));
        }
        if self.default_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "default_duration_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn spacing(&self) -> Spacing {
        Spacing {
            sequential_ms: self.sequential_gap_ms,
            layered_ms: self.layered_gap_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract() {
        let config = MixtapeConfig::default();
        assert_eq!(config.spacing(), Spacing::default());
        assert_eq!(config.default_duration_ms, 1000);
        assert_eq!(config.tail_ms, 500);
        assert_eq!(config.impact_decay_ms, 300);
    }

    #[test]
    fn test_partial_json() {
        let config = MixtapeConfig::from_json_str(r#"{ "sample_rate": 44100, "tail_ms": 250 }"#).unwrap();
        assert_eq!(config.sample_rate, 44_100.0);
        assert_eq!(config.tail_ms, 250);
        assert_eq!(config.layered_gap_ms, 300);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            MixtapeConfig::from_json_str(r#"{ "sample_rate": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MixtapeConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MixtapeConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
