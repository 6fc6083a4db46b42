//! Delivery seam between the engine and the caller's transport
//!
//! The engine never sends anything itself. It calls a [`Delivery`]
//! implementation once per attempt and only looks at success or failure.

mod error;
mod message;
mod simulated;

pub use error::DeliveryError;
pub use message::OutboundMessage;
pub use simulated::{SimulatedDelivery, SimulatedReceipt};

use async_trait::async_trait;
use std::future::Future;

/// Delivers one job payload
///
/// Implementations may be invoked up to `max_retries + 1` times for the same
/// job, so they must be safe to repeat. A future abandoned after a timeout is
/// dropped, which must not leak the underlying connection.
#[async_trait]
pub trait Delivery<T>: Send + Sync {
    /// Value produced by a successful delivery
    type Output: Send + 'static;

    async fn deliver(&self, payload: &T, index: usize) -> Result<Self::Output, DeliveryError>;
}

#[async_trait]
impl<T, R, F, Fut> Delivery<T> for F
where
    F: Fn(&T, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, DeliveryError>> + Send,
    T: Sync,
    R: Send + 'static,
{
    type Output = R;

    async fn deliver(&self, payload: &T, index: usize) -> Result<R, DeliveryError> {
        self(payload, index).await
    }
}
