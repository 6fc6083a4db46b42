//! Retry controller

use super::policy::RetryPolicy;
use crate::core::batch::{BatchResult, Job};
use crate::core::delivery::{Delivery, DeliveryError};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Runs one job to completion: each attempt races the timeout, failures
/// back off and retry until the policy is exhausted
#[derive(Debug, Clone, Default)]
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Attempt `job` until it succeeds or retries run out
    pub async fn attempt<T, D>(&self, job: &Job<T>, delivery: &D) -> BatchResult<D::Output>
    where
        D: Delivery<T> + ?Sized,
    {
        self.run(job, delivery, None).await
    }

    /// Like [`RetryController::attempt`], but stops retrying once `cancel`
    /// fires; an attempt already in flight still finishes
    pub async fn attempt_cancellable<T, D>(
        &self,
        job: &Job<T>,
        delivery: &D,
        cancel: &CancellationToken,
    ) -> BatchResult<D::Output>
    where
        D: Delivery<T> + ?Sized,
    {
        self.run(job, delivery, Some(cancel)).await
    }

    async fn run<T, D>(
        &self,
        job: &Job<T>,
        delivery: &D,
        cancel: Option<&CancellationToken>,
    ) -> BatchResult<D::Output>
    where
        D: Delivery<T> + ?Sized,
    {
        let max_retries = self.policy.max_retries;

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return BatchResult::failed(job.index, DeliveryError::Cancelled.to_string(), 0);
        }

        let mut last_error = DeliveryError::Cancelled;
        for attempt in 0..=max_retries {
            let started = Instant::now();
            let outcome = match tokio::time::timeout(
                self.policy.timeout,
                delivery.deliver(&job.payload, job.index),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(DeliveryError::Timeout {
                    after_ms: self.policy.timeout.as_millis() as u64,
                }),
            };

            match outcome {
                Ok(value) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    if attempt > 0 {
                        debug!("Job {} succeeded on retry {}", job.index, attempt);
                    }
                    return BatchResult::succeeded(job.index, value, attempt, duration_ms);
                }
                Err(err) => {
                    warn!(
                        "Job {} attempt {}/{} failed: {}",
                        job.index,
                        attempt + 1,
                        self.policy.max_attempts(),
                        err
                    );
                    last_error = err;
                }
            }

            if attempt < max_retries {
                let delay = self.policy.delay_for_attempt(attempt);
                debug!("Job {} retrying in {}ms", job.index, delay.as_millis());

                match cancel {
                    Some(token) => {
                        tokio::select! {
                            biased;
                            _ = token.cancelled() => {
                                warn!("Job {} retries stopped by cancellation", job.index);
                                return BatchResult::failed(
                                    job.index,
                                    last_error.to_string(),
                                    attempt + 1,
                                );
                            }
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                    None => tokio::time::sleep(delay).await,
                }
            }
        }

        error!(
            "Job {} failed after {} attempts: {}",
            job.index,
            self.policy.max_attempts(),
            last_error
        );
        BatchResult::failed(
            job.index,
            last_error.to_string(),
            max_retries.saturating_add(1),
        )
    }
}
