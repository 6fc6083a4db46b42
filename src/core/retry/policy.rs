//! Backoff schedule

use crate::core::batch::BatchOptions;
use std::time::Duration;

/// Share of the delay used as the jitter range, centred on the delay
const JITTER_FACTOR: f64 = 0.1;

/// How many times to attempt a job, how long each attempt may take, and how
/// long to wait in between
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub timeout: Duration,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_options(&BatchOptions::default())
    }
}

impl RetryPolicy {
    pub fn from_options(options: &BatchOptions) -> Self {
        Self {
            max_retries: options.max_retries,
            timeout: options.timeout,
            base_backoff: options.base_backoff,
            max_backoff: options.max_backoff,
            backoff_multiplier: options.backoff_multiplier,
            jitter: options.jitter,
        }
    }

    /// First attempt plus retries
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// `min(base * multiplier^attempt, max)` without jitter
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let millis = self.base_backoff.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let max = self.max_backoff.as_millis() as f64;
        if !millis.is_finite() || millis >= max {
            self.max_backoff
        } else {
            Duration::from_millis(millis as u64)
        }
    }

    /// Delay to sleep after failed `attempt`, jittered when enabled
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.backoff_delay(attempt);
        if !self.jitter {
            return delay;
        }

        let millis = delay.as_millis() as f64;
        let jitter = millis * JITTER_FACTOR * (rand::random::<f64>() - 0.5);
        let jittered = (millis + jitter).max(0.0);
        Duration::from_millis(jittered as u64).min(self.max_backoff)
    }
}
