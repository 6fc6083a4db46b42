//! Per-attempt delivery errors

use thiserror::Error;

/// Why a single delivery attempt failed
///
/// The rendered message is what ends up in `BatchResult::error` and what the
/// summary categorizes, so timeouts and cancellations carry fixed prefixes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The transport reported a failure
    #[error("{0}")]
    Transport(String),

    /// The attempt did not finish in time
    #[error("Timeout: delivery did not finish within {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// The run was cancelled before this job could start
    #[error("Cancelled: dispatch stopped before delivery")]
    Cancelled,

    /// The delivery task panicked
    #[error("Internal error: delivery task panicked")]
    Panicked,
}

impl DeliveryError {
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }
}

impl From<String> for DeliveryError {
    fn from(message: String) -> Self {
        Self::Transport(message)
    }
}

impl From<&str> for DeliveryError {
    fn from(message: &str) -> Self {
        Self::Transport(message.to_string())
    }
}

impl From<std::io::Error> for DeliveryError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
