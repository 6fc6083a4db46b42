//! Error classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket a failure message falls into
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCategory {
    Timeout,
    ConnectionError,
    TransportError,
    AuthError,
    RateLimited,
    /// Prefix of the message before its first colon
    Other(String),
    Unknown,
}

impl ErrorCategory {
    /// Classify a failure message by case-insensitive substring
    ///
    /// Rules are checked in order and the first match wins, so
    /// "SMTP connection refused" is a connection error.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|n| lowered.contains(n));

        if contains_any(&["timeout", "tempo"]) {
            return Self::Timeout;
        }
        if contains_any(&["connection", "conexão"]) {
            return Self::ConnectionError;
        }
        if contains_any(&["smtp", "email"]) {
            return Self::TransportError;
        }
        if contains_any(&["auth", "autenticação"]) {
            return Self::AuthError;
        }
        if contains_any(&["rate", "limit"]) {
            return Self::RateLimited;
        }

        let prefix = message.split(':').next().unwrap_or_default().trim();
        if prefix.is_empty() {
            Self::Unknown
        } else {
            Self::Other(prefix.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Timeout => "Timeout",
            Self::ConnectionError => "ConnectionError",
            Self::TransportError => "TransportError",
            Self::AuthError => "AuthError",
            Self::RateLimited => "RateLimited",
            Self::Other(prefix) => prefix,
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
