//! Rate limiter types and data structures

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of evaluating one start against the limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the start fits in the current window
    pub allowed: bool,
    /// Starts already counted in the window
    pub current_count: u32,
    /// Effective limit, the lower of rate and burst
    pub limit: u32,
    /// Starts left in the window
    pub remaining: u32,
    /// How long to wait before trying again, only set when not allowed
    pub retry_after: Option<Duration>,
}

/// Mutable window bookkeeping, owned by one [`super::RateLimiter`]
#[derive(Debug, Clone)]
pub struct RateLimiterState {
    pub window_start: Instant,
    pub units_in_window: u32,
    pub burst_count: u32,
    /// Start times inside the trailing window, sliding strategy only
    pub(super) starts: VecDeque<Instant>,
}

impl RateLimiterState {
    pub(super) fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            units_in_window: 0,
            burst_count: 0,
            starts: VecDeque::new(),
        }
    }

    pub(super) fn reset(&mut self, now: Instant) {
        self.window_start = now;
        self.units_in_window = 0;
        self.burst_count = 0;
    }
}
