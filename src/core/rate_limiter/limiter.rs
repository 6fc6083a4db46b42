//! Core rate limiter implementation

use super::types::{RateLimitResult, RateLimiterState};
use crate::config::models::rate_limit::{RateLimitConfig, RateLimitStrategy};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Process-local limiter shared by every task of one run
///
/// The state lock is held while a caller sleeps out the window, so callers
/// are admitted one at a time in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    pub(super) config: RateLimitConfig,
    pub(super) state: Mutex<RateLimiterState>,
}

impl RateLimiter {
    /// Create a new rate limiter; the first window opens now
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RateLimiterState::new(Instant::now())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Evaluate a start without recording it
    pub async fn check(&self) -> RateLimitResult {
        let mut state = self.state.lock().await.clone();
        self.evaluate(&mut state, Instant::now(), false)
    }

    /// Record a start if it fits, without waiting
    pub async fn try_acquire(&self) -> RateLimitResult {
        let mut state = self.state.lock().await;
        self.evaluate(&mut state, Instant::now(), true)
    }

    /// Wait until a start fits under both limits, then record it
    pub async fn wait_if_needed(&self) {
        let mut state = self.state.lock().await;
        loop {
            let result = self.evaluate(&mut state, Instant::now(), true);
            match result.retry_after {
                None => return,
                Some(wait) => {
                    debug!(
                        "Rate limit reached ({}/{}), waiting {}ms",
                        result.current_count,
                        result.limit,
                        wait.as_millis()
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Like [`RateLimiter::wait_if_needed`], but gives up when `cancel`
    /// fires; returns whether the start was recorded
    pub async fn wait_if_needed_cancellable(&self, cancel: &CancellationToken) -> bool {
        let mut state = tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            state = self.state.lock() => state,
        };
        loop {
            if cancel.is_cancelled() {
                return false;
            }
            let result = self.evaluate(&mut state, Instant::now(), true);
            match result.retry_after {
                None => return true,
                Some(wait) => {
                    debug!(
                        "Rate limit reached ({}/{}), waiting {}ms",
                        result.current_count,
                        result.limit,
                        wait.as_millis()
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!("Rate limit wait cancelled");
                            return false;
                        }
                        _ = tokio::time::sleep(wait) => {}
                    }
                }
            }
        }
    }

    /// Snapshot of the window bookkeeping
    pub async fn state(&self) -> RateLimiterState {
        self.state.lock().await.clone()
    }

    fn evaluate(&self, state: &mut RateLimiterState, now: Instant, record: bool) -> RateLimitResult {
        match self.config.strategy {
            RateLimitStrategy::FixedWindow => self.check_fixed_window_impl(state, now, record),
            RateLimitStrategy::SlidingWindow => self.check_sliding_window_impl(state, now, record),
        }
    }
}
