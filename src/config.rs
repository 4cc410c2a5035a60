//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub controller: ControllerConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

/// Controller polling and recenter gesture configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    #[serde(default = "default_poll_rate_hz")]
    pub poll_rate_hz: u32,

    #[serde(default = "default_recenter_hold_ms")]
    pub recenter_hold_ms: u64,
}

/// Recorded session playback configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    #[serde(default = "default_replay_path")]
    pub path: String,

    #[serde(default)]
    pub loop_playback: bool,
}

/// Log output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Directory for rotating log files. Empty means stdout only.
    #[serde(default)]
    pub dir: String,
}

// Default value functions
fn default_poll_rate_hz() -> u32 { 60 }
fn default_recenter_hold_ms() -> u64 { 1000 }

fn default_replay_path() -> String { "recordings/session.jsonl".to_string() }

impl ControllerConfig {
    /// Interval between two consecutive polls
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.poll_rate_hz.max(1)))
    }

    /// How long the home button must be held to trigger a recenter
    #[must_use]
    pub fn recenter_hold(&self) -> Duration {
        Duration::from_millis(self.recenter_hold_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_rate_hz: default_poll_rate_hz(),
            recenter_hold_ms: default_recenter_hold_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daydream_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.controller.poll_rate_hz == 0 || self.controller.poll_rate_hz > 1000 {
            return Err(BridgeError::Config(
                toml::de::Error::custom("poll_rate_hz must be between 1 and 1000")
            ));
        }

        if self.controller.recenter_hold_ms == 0 || self.controller.recenter_hold_ms > 10000 {
            return Err(BridgeError::Config(
                toml::de::Error::custom("recenter_hold_ms must be between 1 and 10000")
            ));
        }

        if self.replay.path.is_empty() {
            return Err(BridgeError::Config(
                toml::de::Error::custom("replay path cannot be empty")
            ));
        }

        Ok(())
    }
}
