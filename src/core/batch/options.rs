//! Runtime options for a dispatch run

use crate::config::models::RateLimitConfig;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Runs at least this long get the large-volume adjustments
pub const LARGE_VOLUME_THRESHOLD: usize = 500;
/// Upper bound on the widened chunk size
pub const LARGE_VOLUME_MAX_BATCH_SIZE: usize = 40;
/// Lower bound on the shortened inter-chunk pause
pub const LARGE_VOLUME_MIN_DELAY: Duration = Duration::from_millis(750);

/// `(batch_number, total_batches, success_count, error_count)`
pub type BatchCompleteCallback = Arc<dyn Fn(usize, usize, usize, usize) + Send + Sync>;
/// `(current, total)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Options for [`super::BatchDispatcher`]
#[derive(Clone)]
pub struct BatchOptions {
    /// Jobs per chunk (default: 25)
    pub batch_size: usize,
    /// Pause between chunks (default: 1s)
    pub delay_between_batches: Duration,
    /// Deliveries in flight at once (default: 25)
    pub max_concurrent: usize,
    /// Retries after the first attempt (default: 3)
    pub max_retries: u32,
    /// Per-attempt timeout (default: 30s)
    pub timeout: Duration,
    /// Growth factor of the backoff delay (default: 1.5)
    pub backoff_multiplier: f64,
    /// First backoff delay (default: 1s)
    pub base_backoff: Duration,
    /// Backoff ceiling (default: 10s)
    pub max_backoff: Duration,
    /// Randomize backoff delays (default: true)
    pub jitter: bool,
    pub rate_limit: Option<RateLimitConfig>,
    /// Widen chunks and shorten pauses on large runs (default: false)
    pub large_volume_optimizations: bool,
    pub on_batch_complete: Option<BatchCompleteCallback>,
    pub on_progress: Option<ProgressCallback>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 25,
            delay_between_batches: Duration::from_millis(1000),
            max_concurrent: 25,
            max_retries: 3,
            timeout: Duration::from_millis(30_000),
            backoff_multiplier: 1.5,
            base_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(10_000),
            jitter: true,
            rate_limit: None,
            large_volume_optimizations: false,
            on_batch_complete: None,
            on_progress: None,
        }
    }
}

impl fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOptions")
            .field("batch_size", &self.batch_size)
            .field("delay_between_batches", &self.delay_between_batches)
            .field("max_concurrent", &self.max_concurrent)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("base_backoff", &self.base_backoff)
            .field("max_backoff", &self.max_backoff)
            .field("jitter", &self.jitter)
            .field("rate_limit", &self.rate_limit)
            .field("large_volume_optimizations", &self.large_volume_optimizations)
            .field("on_batch_complete", &self.on_batch_complete.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_delay_between_batches(mut self, delay: Duration) -> Self {
        self.delay_between_batches = delay;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set timeout per attempt
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the first backoff delay and its ceiling
    pub fn with_backoff_bounds(mut self, base: Duration, max: Duration) -> Self {
        self.base_backoff = base;
        self.max_backoff = max;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_large_volume_optimizations(mut self, enabled: bool) -> Self {
        self.large_volume_optimizations = enabled;
        self
    }

    /// Called once per finished chunk
    pub fn on_batch_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize, usize, usize) + Send + Sync + 'static,
    {
        self.on_batch_complete = Some(Arc::new(callback));
        self
    }

    /// Called once per finished job
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    fn large_volume(&self, total: usize) -> bool {
        self.large_volume_optimizations && total >= LARGE_VOLUME_THRESHOLD
    }

    /// Chunk size used for a run of `total` jobs
    pub fn effective_batch_size(&self, total: usize) -> usize {
        if self.large_volume(total) {
            (self.batch_size * 3 / 2).min(LARGE_VOLUME_MAX_BATCH_SIZE).max(1)
        } else {
            self.batch_size
        }
    }

    /// Inter-chunk pause used for a run of `total` jobs
    pub fn effective_delay(&self, total: usize) -> Duration {
        if self.large_volume(total) {
            (self.delay_between_batches * 3 / 4).max(LARGE_VOLUME_MIN_DELAY)
        } else {
            self.delay_between_batches
        }
    }
}
