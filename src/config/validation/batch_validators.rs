//! Batch options and rate limit validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::batch::BatchOptions;
use std::time::Duration;
use tracing::debug;

impl Validate for BatchOptions {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating batch options");

        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }

        if self.max_concurrent == 0 {
            return Err("max_concurrent must be greater than 0".to_string());
        }

        if self.timeout.is_zero() {
            return Err("timeout must be greater than 0".to_string());
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(format!(
                "backoff_multiplier must be a finite number >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.max_backoff < self.base_backoff {
            return Err(format!(
                "max_backoff ({:?}) must not be shorter than base_backoff ({:?})",
                self.max_backoff, self.base_backoff
            ));
        }

        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.validate()?;
        }

        Ok(())
    }
}

impl Validate for BatchSettings {
    fn validate(&self) -> Result<(), String> {
        self.clone().into_options(None).validate()
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating rate limit configuration");

        if self.units_per_second == 0 {
            return Err("rate_limit.units_per_second must be greater than 0".to_string());
        }

        if self.burst_limit == 0 {
            return Err("rate_limit.burst_limit must be greater than 0".to_string());
        }

        if self.window() == Duration::ZERO {
            return Err("rate_limit.window_ms must be greater than 0".to_string());
        }

        Ok(())
    }
}
