//! Logging setup
//!
//! The engine only emits `tracing` events. Binaries call [`init_logging`]
//! once to install a subscriber; libraries embedding the engine bring their
//! own.

use crate::config::models::LoggingConfig;
use crate::utils::error::{DispatchError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `config.level` when set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| DispatchError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| DispatchError::config(format!("Failed to install logger: {}", e)))
}
