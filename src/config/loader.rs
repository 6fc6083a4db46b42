//! Configuration loading from environment variables
//!
//! Variables can build a config on their own or overlay one loaded from a
//! file. A variable that is set always wins, even when its value equals the
//! default. Recognized variables, all optional:
//!
//! | variable | field |
//! |----------|-------|
//! | `DISPATCH_BATCH_SIZE` | `batch.batch_size` |
//! | `DISPATCH_DELAY_MS` | `batch.delay_between_batches_ms` |
//! | `DISPATCH_MAX_CONCURRENT` | `batch.max_concurrent` |
//! | `DISPATCH_MAX_RETRIES` | `batch.max_retries` |
//! | `DISPATCH_TIMEOUT_MS` | `batch.timeout_ms` |
//! | `DISPATCH_BACKOFF_MULTIPLIER` | `batch.backoff_multiplier` |
//! | `DISPATCH_JITTER` | `batch.jitter` |
//! | `DISPATCH_LARGE_VOLUME` | `batch.large_volume_optimizations` |
//! | `DISPATCH_RATE_LIMIT` | `rate_limit.units_per_second` |
//! | `DISPATCH_BURST_LIMIT` | `rate_limit.burst_limit` |
//! | `DISPATCH_PROVIDER` | `provider` |
//! | `DISPATCH_LOG_LEVEL` | `logging.level` |
//! | `DISPATCH_LOG_JSON` | `logging.json` |

use super::Config;
use super::models::*;
use crate::utils::error::{DispatchError, Result};
use std::env;
use std::str::FromStr;
use tracing::{debug, info};

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Overlay the `DISPATCH_*` environment variables that are set
    pub fn with_env_overrides(self) -> Result<Self> {
        info!("Applying configuration from environment variables");
        self.with_lookup_overrides(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_lookup_overrides(lookup)
    }

    /// Overlay every variable `lookup` returns a value for, then validate
    pub fn with_lookup_overrides<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self;

        if let Some(v) = parse_var(&lookup, "DISPATCH_BATCH_SIZE")? {
            config.batch.batch_size = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_DELAY_MS")? {
            config.batch.delay_between_batches_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_MAX_CONCURRENT")? {
            config.batch.max_concurrent = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_MAX_RETRIES")? {
            config.batch.max_retries = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_TIMEOUT_MS")? {
            config.batch.timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_BACKOFF_MULTIPLIER")? {
            config.batch.backoff_multiplier = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_JITTER")? {
            config.batch.jitter = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_LARGE_VOLUME")? {
            config.batch.large_volume_optimizations = v;
        }

        let units: Option<u32> = parse_var(&lookup, "DISPATCH_RATE_LIMIT")?;
        let burst: Option<u32> = parse_var(&lookup, "DISPATCH_BURST_LIMIT")?;
        if units.is_some() || burst.is_some() {
            let mut rate_limit = config.rate_limit.take().unwrap_or_default();
            if let Some(units) = units {
                rate_limit.units_per_second = units;
                // Without an explicit burst, the rate itself is the only cap
                rate_limit.burst_limit = burst.unwrap_or(units);
            }
            if let Some(burst) = burst {
                rate_limit.burst_limit = burst;
            }
            config.rate_limit = Some(rate_limit);
        }

        if let Some(provider) = lookup("DISPATCH_PROVIDER") {
            config.provider = Some(parse_provider(&provider)?);
        }

        if let Some(level) = lookup("DISPATCH_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_LOG_JSON")? {
            config.logging.json = v;
        }

        config.validate()?;
        debug!("Environment variables applied");
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| DispatchError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(None),
    }
}

fn parse_provider(raw: &str) -> Result<ProviderProfile> {
    match raw.trim().to_lowercase().as_str() {
        "gmail" => Ok(ProviderProfile::Gmail),
        "outlook" => Ok(ProviderProfile::Outlook),
        "yahoo" => Ok(ProviderProfile::Yahoo),
        "other" => Ok(ProviderProfile::Other),
        other => Err(DispatchError::Config(format!(
            "Invalid DISPATCH_PROVIDER: unknown provider '{}'",
            other
        ))),
    }
}
