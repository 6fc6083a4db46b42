//! Concurrency limiter
//!
//! A counting semaphore that bounds how many deliveries are in flight.
//! Tokio's semaphore is fair, so waiters are admitted in arrival order.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Bounds concurrent deliveries to `max_concurrent`
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

/// Proof of a held permit
///
/// Dropping the token frees the permit. [`ReleaseToken::release`] does the
/// same thing explicitly.
#[derive(Debug)]
pub struct ReleaseToken {
    _permit: OwnedSemaphorePermit,
}

impl ReleaseToken {
    /// Give the permit back
    pub fn release(self) {
        debug!("Released concurrency permit");
    }
}

impl ConcurrencyLimiter {
    /// Create a limiter; `max_concurrent` of zero is clamped to one
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Wait for a free slot
    pub async fn acquire(&self) -> ReleaseToken {
        // The semaphore is owned by this limiter and never closed.
        let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => unreachable!("concurrency semaphore closed"),
        };
        debug!(
            "Acquired concurrency permit ({} of {} free)",
            self.semaphore.available_permits(),
            self.max_concurrent
        );
        ReleaseToken { _permit: permit }
    }

    /// Wait for a free slot unless `cancel` fires first
    pub async fn acquire_cancellable(&self, cancel: &CancellationToken) -> Option<ReleaseToken> {
        if cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Permit acquisition cancelled");
                None
            }
            token = self.acquire() => Some(token),
        }
    }

    /// Slots currently free
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Deliveries currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.semaphore.available_permits()
    }
}
