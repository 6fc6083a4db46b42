//! Outbound mail provider profiles
//!
//! Hosted mail providers throttle senders differently. A profile carries a
//! conservative preset that keeps a run under the provider's quota.

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known provider families, detected from the SMTP host
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderProfile {
    Gmail,
    Outlook,
    Yahoo,
    #[default]
    Other,
}

/// Throughput preset for a provider profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    pub rate_limit_per_minute: u32,
    pub burst_limit: u32,
    pub base_delay_ms: u64,
    pub max_concurrent: usize,
}

impl ProviderProfile {
    /// Detect the provider from an SMTP host name
    pub fn detect(host: &str) -> Self {
        let host = host.to_lowercase();
        if host.contains("gmail") {
            Self::Gmail
        } else if host.contains("outlook") || host.contains("live") {
            Self::Outlook
        } else if host.contains("yahoo") {
            Self::Yahoo
        } else {
            Self::Other
        }
    }

    pub fn preset(&self) -> ProviderPreset {
        match self {
            Self::Gmail => ProviderPreset {
                rate_limit_per_minute: 15,
                burst_limit: 5,
                base_delay_ms: 3000,
                max_concurrent: 2,
            },
            Self::Outlook => ProviderPreset {
                rate_limit_per_minute: 20,
                burst_limit: 8,
                base_delay_ms: 2000,
                max_concurrent: 3,
            },
            Self::Yahoo => ProviderPreset {
                rate_limit_per_minute: 18,
                burst_limit: 6,
                base_delay_ms: 2500,
                max_concurrent: 2,
            },
            Self::Other => ProviderPreset {
                rate_limit_per_minute: 25,
                burst_limit: 10,
                base_delay_ms: 1500,
                max_concurrent: 5,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::Outlook => "outlook",
            Self::Yahoo => "yahoo",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ProviderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderPreset {
    /// Overlay the preset on batch settings; one chunk per concurrency round
    pub fn apply(&self, settings: BatchSettings) -> BatchSettings {
        BatchSettings {
            batch_size: self.max_concurrent,
            delay_between_batches_ms: self.base_delay_ms,
            max_concurrent: self.max_concurrent,
            ..settings
        }
    }

    /// Per-minute rate limit matching the preset
    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig::per_minute(self.rate_limit_per_minute, self.burst_limit)
    }
}
