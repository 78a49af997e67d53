//! Configuration file.
//!
//! Every section is optional; missing sections fall back to their
//! defaults, so an empty file is a valid configuration.

use crate::generation::{GenerationError, GeneratorSettings};
use crate::seeds::{PoolConfig, StatusCacheConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),
    #[error("pool total must be at least 1")]
    EmptyPool,
    #[error("max_claim_attempts must be at least 1")]
    NoClaimAttempts,
    #[error("status cache ttl must be at least 1 second")]
    ZeroTtl,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

impl From<GenerationError> for ConfigError {
    fn from(e: GenerationError) -> Self {
        ConfigError::InvalidCanvas(e.to_string())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Seed pool snapshot file.
    pub store_path: PathBuf,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("seed-pool.json"),
            metrics_port: 9090,
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub generation: GeneratorSettings,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub status: StatusCacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        if self.pool.total == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.pool.max_claim_attempts == 0 {
            return Err(ConfigError::NoClaimAttempts);
        }
        if self.status.ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        Ok(())
    }
}
