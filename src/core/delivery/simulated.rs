//! Simulated transport for dry runs and load tests

use super::{Delivery, DeliveryError, OutboundMessage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Failure messages a real SMTP relay tends to produce
const SIMULATED_FAILURES: &[&str] = &[
    "SMTP connection refused",
    "Timeout waiting for server greeting",
    "535 authentication failed",
    "421 rate limit exceeded, try again later",
    "550 mailbox unavailable: user unknown",
];

/// Acknowledgement from the simulated relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedReceipt {
    pub message_id: String,
    pub recipient: String,
}

/// Pretends to send mail: sleeps for `latency` and fails with probability
/// `failure_rate`
#[derive(Debug)]
pub struct SimulatedDelivery {
    latency: Duration,
    failure_rate: f64,
    attempts: AtomicU64,
}

impl SimulatedDelivery {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            attempts: AtomicU64::new(0),
        }
    }

    /// Total attempts made so far, retries included
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Delivery<OutboundMessage> for SimulatedDelivery {
    type Output = SimulatedReceipt;

    async fn deliver(
        &self,
        message: &OutboundMessage,
        index: usize,
    ) -> Result<SimulatedReceipt, DeliveryError> {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(self.latency).await;

        if self.failure_rate > 0.0 && rand::random::<f64>() < self.failure_rate {
            let reason = SIMULATED_FAILURES[attempt as usize % SIMULATED_FAILURES.len()];
            debug!("Simulated failure for job {} ({}): {}", index, message.to, reason);
            return Err(DeliveryError::transport(reason));
        }

        Ok(SimulatedReceipt {
            message_id: format!("<{}@dispatch.local>", Uuid::new_v4()),
            recipient: message.to.clone(),
        })
    }
}
