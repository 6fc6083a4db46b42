//! Chunk scheduler

use super::observer::{BatchObserver, CallbackObserver, NoopObserver};
use super::options::BatchOptions;
use super::report::BatchReport;
use super::types::{BatchResult, Job};
use crate::config::Validate;
use crate::core::delivery::{Delivery, DeliveryError};
use crate::core::limiter::ConcurrencyLimiter;
use crate::core::metrics::{ThroughputTracker, summarize};
use crate::core::rate_limiter::RateLimiter;
use crate::core::retry::{RetryController, RetryPolicy};
use crate::utils::error::{DispatchError, Result};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Runs a list of jobs through a delivery in rate-limited chunks
///
/// All limiter state is created per run and dropped when the run ends, so
/// one dispatcher can serve any number of sequential or concurrent runs.
///
/// # Example
/// ```rust,ignore
/// use batch_dispatch::core::batch::{BatchDispatcher, BatchOptions};
/// use batch_dispatch::config::RateLimitConfig;
///
/// let dispatcher = BatchDispatcher::new(
///     BatchOptions::new()
///         .with_max_concurrent(5)
///         .with_rate_limit(RateLimitConfig::new(10, 10)),
/// );
///
/// let results = dispatcher.run(messages, |message: &OutboundMessage, _| {
///     let message = message.clone();
///     async move { relay.send(message).await }
/// }).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchDispatcher {
    options: BatchOptions,
}

/// Shared state of one run
struct RunContext<D> {
    delivery: D,
    limiter: ConcurrencyLimiter,
    rate_limiter: Option<RateLimiter>,
    retry: RetryController,
    cancel: CancellationToken,
}

impl<D> RunContext<D> {
    /// Permit, rate limit, retries; in that order
    async fn process<T>(&self, job: Job<T>) -> BatchResult<D::Output>
    where
        D: Delivery<T>,
    {
        let Some(permit) = self.limiter.acquire_cancellable(&self.cancel).await else {
            return cancelled(job.index);
        };

        if let Some(rate_limiter) = &self.rate_limiter {
            if !rate_limiter.wait_if_needed_cancellable(&self.cancel).await {
                return cancelled(job.index);
            }
        }

        let result = self
            .retry
            .attempt_cancellable(&job, &self.delivery, &self.cancel)
            .await;
        permit.release();
        result
    }
}

fn cancelled<R>(index: usize) -> BatchResult<R> {
    BatchResult::failed(index, DeliveryError::Cancelled.to_string(), 0)
}

impl BatchDispatcher {
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Dispatch every job and return one result per job, in completion order
    ///
    /// Only invalid options produce an error; delivery failures are reported
    /// in the results.
    pub async fn run<T, D>(&self, jobs: Vec<T>, delivery: D) -> Result<Vec<BatchResult<D::Output>>>
    where
        T: Send + Sync + 'static,
        D: Delivery<T> + 'static,
    {
        let report = self
            .run_with_report(jobs, delivery, CancellationToken::new())
            .await?;
        Ok(report.into_results())
    }

    /// Dispatch with a cancellation token and return the full report
    ///
    /// Cancelling stops new deliveries from starting. Deliveries already in
    /// flight finish, and every job that never started gets a cancelled
    /// result. Dropping the returned future has the same effect on the
    /// spawned deliveries.
    pub async fn run_with_report<T, D>(
        &self,
        jobs: Vec<T>,
        delivery: D,
        cancel: CancellationToken,
    ) -> Result<BatchReport<D::Output>>
    where
        T: Send + Sync + 'static,
        D: Delivery<T> + 'static,
    {
        self.dispatch(jobs, delivery, cancel, &NoopObserver).await
    }

    /// Like [`BatchDispatcher::run_with_report`], also notifying `observer`
    pub async fn run_with_observer<T, D>(
        &self,
        jobs: Vec<T>,
        delivery: D,
        cancel: CancellationToken,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport<D::Output>>
    where
        T: Send + Sync + 'static,
        D: Delivery<T> + 'static,
    {
        self.dispatch(jobs, delivery, cancel, observer).await
    }

    async fn dispatch<T, D>(
        &self,
        jobs: Vec<T>,
        delivery: D,
        cancel: CancellationToken,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport<D::Output>>
    where
        T: Send + Sync + 'static,
        D: Delivery<T> + 'static,
    {
        self.options
            .validate()
            .map_err(|e| DispatchError::config(format!("Invalid batch options: {}", e)))?;

        let callbacks = CallbackObserver::new(&self.options);
        let observers: [&dyn BatchObserver; 2] = [&callbacks, observer];

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();

        let total = jobs.len();
        let batch_size = self.options.effective_batch_size(total);
        let delay = self.options.effective_delay(total);
        let total_batches = total.div_ceil(batch_size);

        info!(
            %run_id,
            "Dispatching {} jobs in {} batches of up to {}",
            total, total_batches, batch_size
        );

        // Dropping the run future cancels the tasks it spawned; the caller's
        // token is left untouched.
        let cancel = cancel.child_token();
        let _abandon_guard = cancel.clone().drop_guard();

        let ctx = Arc::new(RunContext {
            delivery,
            limiter: ConcurrencyLimiter::new(self.options.max_concurrent),
            rate_limiter: self.options.rate_limit.clone().map(RateLimiter::new),
            retry: RetryController::new(RetryPolicy::from_options(&self.options)),
            cancel,
        });

        let mut pending = jobs
            .into_iter()
            .enumerate()
            .map(|(index, payload)| Job::new(index, payload));
        let mut results = Vec::with_capacity(total);
        let mut tracker = ThroughputTracker::new();

        for batch_number in 1..=total_batches {
            if ctx.cancel.is_cancelled() {
                break;
            }

            let chunk: Vec<Job<T>> = pending.by_ref().take(batch_size).collect();
            info!(
                "Processing batch {}/{} ({} jobs)",
                batch_number,
                total_batches,
                chunk.len()
            );

            let mut tasks: FuturesUnordered<_> = chunk
                .into_iter()
                .map(|job| {
                    let index = job.index;
                    let ctx = Arc::clone(&ctx);
                    let handle = tokio::spawn(async move { ctx.process(job).await });
                    async move { (index, handle.await) }
                })
                .collect();

            let mut success_count = 0;
            let mut error_count = 0;
            while let Some((index, joined)) = tasks.next().await {
                let result = joined.unwrap_or_else(|err| {
                    error!("Delivery task for job {} failed: {}", index, err);
                    BatchResult::failed(index, DeliveryError::Panicked.to_string(), 0)
                });

                if result.success {
                    success_count += 1;
                } else {
                    error_count += 1;
                }
                tracker.record();
                for observer in observers {
                    observer.on_progress(index + 1, total);
                }
                results.push(result);
            }

            info!(
                "Batch {}/{} complete: {} succeeded, {} failed",
                batch_number, total_batches, success_count, error_count
            );
            for observer in observers {
                observer.on_batch_complete(batch_number, total_batches, success_count, error_count);
            }

            if batch_number < total_batches {
                debug!("Pausing {}ms before next batch", delay.as_millis());
                tokio::select! {
                    biased;
                    _ = ctx.cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        let skipped = pending.len();
        if skipped > 0 {
            info!("Dispatch cancelled, {} jobs were never started", skipped);
            results.extend(pending.map(|job| cancelled(job.index)));
        }

        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            elapsed: clock.elapsed(),
            results,
            cancelled: ctx.cancel.is_cancelled(),
            peak_throughput: tracker.peak(),
        };
        info!(
            %run_id,
            "Dispatch finished in {}ms: {}",
            report.elapsed.as_millis(),
            summarize(&report.results)
        );

        Ok(report)
    }
}
