//! Configuration management
//!
//! Capture tuning and record-store settings, loaded from the platform config
//! directory with sensible defaults when no file exists. CLI flags override
//! loaded values.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::CaptureConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Capture loop tuning
    #[serde(default)]
    pub capture: CaptureSettings,
    /// Record store settings
    #[serde(default)]
    pub store: StoreSettings,
}

/// Capture loop tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Poll iterations per capture attempt
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Wait between polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    20
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl CaptureSettings {
    /// Convert to the capture controller's config type
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            max_attempts: self.max_attempts.max(1),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Record store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Directory for appliance record files; current directory when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl StoreSettings {
    /// Resolved output directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Path of the configuration file
pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(dir.join("ir-scribe").join("config.toml"))
}

impl Config {
    /// Load from the config file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.capture.max_attempts, 20);
        assert_eq!(config.capture.poll_interval_ms, 1000);
        assert!(config.store.output_dir.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str("[capture]\nmax_attempts = 3\n").unwrap();
        assert_eq!(config.capture.max_attempts, 3);
        assert_eq!(config.capture.poll_interval_ms, 1000);
    }

    #[test]
    fn zero_attempts_clamped_to_one() {
        let settings = CaptureSettings {
            max_attempts: 0,
            poll_interval_ms: 10,
        };
        assert_eq!(settings.capture_config().max_attempts, 1);
    }
}
