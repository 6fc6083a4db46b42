//! Top-level configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating logging configuration");

        if self.level.trim().is_empty() {
            return Err("logging.level cannot be empty".to_string());
        }

        EnvFilter::try_new(&self.level)
            .map_err(|e| format!("Invalid logging.level '{}': {}", self.level, e))?;

        Ok(())
    }
}
