//! Rate limiting strategy implementations

use super::limiter::RateLimiter;
use super::types::{RateLimitResult, RateLimiterState};
use tokio::time::Instant;

impl RateLimiter {
    /// Fixed window with burst control
    ///
    /// Counters reset once a full window has elapsed since `window_start`.
    /// Bursts straddling a window boundary may briefly exceed the limit.
    pub(super) fn check_fixed_window_impl(
        &self,
        state: &mut RateLimiterState,
        now: Instant,
        record: bool,
    ) -> RateLimitResult {
        let window = self.config.window();
        let limit = self.config.effective_limit();

        if now.duration_since(state.window_start) >= window {
            state.reset(now);
        }

        let allowed = state.units_in_window < self.config.units_per_second
            && state.burst_count < self.config.burst_limit;
        let current_count = state.units_in_window;

        if !allowed {
            let elapsed = now.duration_since(state.window_start);
            return RateLimitResult {
                allowed,
                current_count,
                limit,
                remaining: 0,
                retry_after: Some(window.saturating_sub(elapsed)),
            };
        }

        if record {
            state.units_in_window += 1;
            state.burst_count += 1;
        }

        RateLimitResult {
            allowed,
            current_count,
            limit,
            remaining: limit.saturating_sub(state.units_in_window),
            retry_after: None,
        }
    }

    /// Strict sliding window over the last `window` of starts
    pub(super) fn check_sliding_window_impl(
        &self,
        state: &mut RateLimiterState,
        now: Instant,
        record: bool,
    ) -> RateLimitResult {
        let window = self.config.window();
        let limit = self.config.effective_limit();

        // Remove expired starts
        while let Some(&oldest) = state.starts.front() {
            if now.duration_since(oldest) >= window {
                state.starts.pop_front();
            } else {
                break;
            }
        }

        let current_count = state.starts.len() as u32;
        let allowed = current_count < limit;

        if !allowed {
            let retry_after = state
                .starts
                .front()
                .map(|&oldest| window.saturating_sub(now.duration_since(oldest)));
            return RateLimitResult {
                allowed,
                current_count,
                limit,
                remaining: 0,
                retry_after: Some(retry_after.unwrap_or(window)),
            };
        }

        if record {
            state.starts.push_back(now);
            state.units_in_window = state.starts.len() as u32;
            state.burst_count = state.units_in_window;
            if let Some(&oldest) = state.starts.front() {
                state.window_start = oldest;
            }
        }

        RateLimitResult {
            allowed,
            current_count,
            limit,
            remaining: limit.saturating_sub(state.starts.len() as u32),
            retry_after: None,
        }
    }
}
