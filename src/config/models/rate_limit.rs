//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate limiting configuration
///
/// `units_per_second` is the number of delivery starts admitted per window.
/// The window defaults to one second, hence the name; provider presets
/// widen it to a minute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Starts admitted per window
    #[serde(default = "default_units_per_second")]
    pub units_per_second: u32,
    /// Hard cap on starts per window, independent of `units_per_second`
    #[serde(default = "default_burst_limit")]
    pub burst_limit: u32,
    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Rate limiting strategy
    #[serde(default)]
    pub strategy: RateLimitStrategy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            units_per_second: default_units_per_second(),
            burst_limit: default_burst_limit(),
            window_ms: default_window_ms(),
            strategy: RateLimitStrategy::default(),
        }
    }
}

impl RateLimitConfig {
    /// Create a one-second window limiter
    pub fn new(units_per_second: u32, burst_limit: u32) -> Self {
        Self {
            units_per_second,
            burst_limit,
            ..Self::default()
        }
    }

    /// Create a one-minute window limiter
    pub fn per_minute(units_per_minute: u32, burst_limit: u32) -> Self {
        Self {
            units_per_second: units_per_minute,
            burst_limit,
            window_ms: 60_000,
            strategy: RateLimitStrategy::default(),
        }
    }

    /// Set the rate limiting strategy
    pub fn with_strategy(mut self, strategy: RateLimitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the window length
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window_ms = window.as_millis() as u64;
        self
    }

    /// Window length as a duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// The number of starts a single window actually admits
    pub fn effective_limit(&self) -> u32 {
        self.units_per_second.min(self.burst_limit)
    }
}

/// Rate limiting strategy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStrategy {
    /// Fixed window counter, O(1) per call; may admit up to twice the limit
    /// across a window boundary
    #[default]
    FixedWindow,
    /// Sliding log of start times; never exceeds the limit in any window
    SlidingWindow,
}
