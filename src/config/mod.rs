//! Configuration management for the dispatch engine
//!
//! This module handles loading, validation, and merging of the dispatch
//! configuration. A config file looks like:
//!
//! ```yaml
//! batch:
//!   batch_size: 25
//!   delay_between_batches_ms: 1000
//!   max_concurrent: 10
//!   large_volume_optimizations: true
//! rate_limit:
//!   units_per_second: 5
//!   burst_limit: 5
//! provider: gmail
//! logging:
//!   level: info
//! ```

mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::batch::BatchOptions;
use crate::utils::error::{DispatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the dispatch engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Chunking, concurrency, retry and timeout settings
    #[serde(default)]
    pub batch: BatchSettings,
    /// Explicit rate limit; takes precedence over the provider preset
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
    /// Provider profile whose preset overlays the batch settings
    #[serde(default)]
    pub provider: Option<ProviderProfile>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DispatchError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| DispatchError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.batch
            .validate()
            .map_err(|e| DispatchError::Config(format!("Batch config error: {}", e)))?;

        if let Some(rate_limit) = &self.rate_limit {
            rate_limit
                .validate()
                .map_err(|e| DispatchError::Config(format!("Rate limit config error: {}", e)))?;
        }

        self.logging
            .validate()
            .map_err(|e| DispatchError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Batch settings after the provider preset, if any, has been applied
    pub fn effective_batch(&self) -> BatchSettings {
        match self.provider {
            Some(profile) => profile.preset().apply(self.batch.clone()),
            None => self.batch.clone(),
        }
    }

    /// Rate limit to enforce: the explicit one, else the provider preset's
    pub fn effective_rate_limit(&self) -> Option<RateLimitConfig> {
        self.rate_limit
            .clone()
            .or_else(|| self.provider.map(|profile| profile.preset().rate_limit()))
    }

    /// Build runtime batch options (without callbacks)
    pub fn batch_options(&self) -> BatchOptions {
        self.effective_batch()
            .into_options(self.effective_rate_limit())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DispatchError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
