//! Batch dispatch configuration

use super::*;
use crate::core::batch::BatchOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serializable batch settings, as read from a config file or the environment
///
/// Durations are plain millisecond integers so the YAML stays readable.
/// Use [`BatchSettings::into_options`] to get the runtime [`BatchOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSettings {
    /// Jobs per chunk
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between chunks
    #[serde(default = "default_delay_between_batches_ms")]
    pub delay_between_batches_ms: u64,
    /// Deliveries allowed in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-attempt timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Randomize backoff delays
    #[serde(default = "default_true")]
    pub jitter: bool,
    /// Widen chunks and shorten pauses for runs of 500 jobs or more
    #[serde(default)]
    pub large_volume_optimizations: bool,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            delay_between_batches_ms: default_delay_between_batches_ms(),
            max_concurrent: default_max_concurrent(),
            max_retries: default_max_retries(),
            timeout_ms: default_timeout_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            jitter: true,
            large_volume_optimizations: false,
        }
    }
}

impl BatchSettings {
    /// Build runtime options, attaching an optional rate limit
    pub fn into_options(self, rate_limit: Option<RateLimitConfig>) -> BatchOptions {
        let mut options = BatchOptions::new()
            .with_batch_size(self.batch_size)
            .with_delay_between_batches(Duration::from_millis(self.delay_between_batches_ms))
            .with_max_concurrent(self.max_concurrent)
            .with_max_retries(self.max_retries)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_backoff_multiplier(self.backoff_multiplier)
            .with_backoff_bounds(
                Duration::from_millis(self.base_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            )
            .with_jitter(self.jitter)
            .with_large_volume_optimizations(self.large_volume_optimizations);

        if let Some(rate_limit) = rate_limit {
            options = options.with_rate_limit(rate_limit);
        }
        options
    }
}
