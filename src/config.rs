//! Engine configuration
//!
//! Defaults match the tuned production values. A TOML file can override
//! any subset of fields; the simulator layers CLI/env selection on top.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Tunable parameters for the commentary engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Clip set selector; first path segment under `/audio/`.
    pub voice_profile: String,
    /// Clip file extension (no leading dot).
    pub clip_extension: String,
    /// Dead time after any clip finishes, in milliseconds.
    pub cooldown_ms: u64,
    /// Backoff before re-attempting dispatch after a start failure.
    pub dispatch_retry_ms: u64,
    /// Quiet period before the first idle commentary.
    pub idle_delay_ms: u64,
    /// Randomized idle re-arm interval, lower bound (inclusive).
    pub idle_interval_min_ms: u64,
    /// Randomized idle re-arm interval, upper bound (exclusive).
    pub idle_interval_max_ms: u64,
    /// Probability that a projects-section idle voices a project clip
    /// instead of a section entry clip.
    pub project_idle_bias: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voice_profile: "sports-announcer".to_string(),
            clip_extension: "mp3".to_string(),
            cooldown_ms: 1000,
            dispatch_retry_ms: 500,
            idle_delay_ms: 5000,
            idle_interval_min_ms: 6000,
            idle_interval_max_ms: 10000,
            project_idle_bias: 0.6,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing keys keep their
    /// defaults; the result is validated before use.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine depends on.
    pub fn validate(&self) -> Result<()> {
        if self.voice_profile.is_empty() {
            return Err(Error::Config("voice_profile must not be empty".to_string()));
        }
        if self.clip_extension.is_empty() {
            return Err(Error::Config("clip_extension must not be empty".to_string()));
        }
        if self.idle_interval_min_ms >= self.idle_interval_max_ms {
            return Err(Error::Config(format!(
                "idle_interval_min_ms ({}) must be below idle_interval_max_ms ({})",
                self.idle_interval_min_ms, self.idle_interval_max_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.project_idle_bias) {
            return Err(Error::Config(format!(
                "project_idle_bias ({}) must be within [0, 1]",
                self.project_idle_bias
            )));
        }
        Ok(())
    }
}
