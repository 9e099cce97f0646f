//! Configuration module for the selection engine.
//!
//! Provides configuration loading and validation for the worker binary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use selection_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```
//!
//! # Example config
//!
//! ```yaml
//! series:
//!   dir: data/flight-recorder
//!   x:
//!     key: a
//!     kind: numeric
//!   ys: [b, d]
//!   resolution: 1000
//! channel:
//!   capacity: 32
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::XAxisSpec;

/// Default configuration file path.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Default target resolution for provider downsampling.
const DEFAULT_RESOLUTION: usize = 1000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Series data configuration.
    pub series: SeriesConfig,
    /// Channel configuration.
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// Series data configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Directory holding the series data.
    pub dir: PathBuf,
    /// X axis key and representation.
    pub x: XAxisSpec,
    /// Y-keys to select.
    pub ys: Vec<String>,
    /// Target resolution the provider should downsample towards.
    #[serde(default = "default_resolution")]
    pub resolution: usize,
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Capacity of each direction of the duplex channel.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

const fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}

const fn default_capacity() -> usize {
    crate::worker::DEFAULT_CHANNEL_CAPACITY
}

impl EngineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.series.ys.is_empty() {
            return Err(ConfigError::ValidationError(
                "series.ys must name at least one Y-key".to_string(),
            ));
        }
        if self.series.resolution == 0 {
            return Err(ConfigError::ValidationError(
                "series.resolution must be at least 1".to_string(),
            ));
        }
        if self.channel.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "channel.capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate configuration from a YAML file.
///
/// Uses `config.yaml` in the working directory when no path is given.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_string(),
        source,
    })?;
    let config: EngineConfig = serde_yaml_bw::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

// =============================================================================
// Tests
// =============================================================================
