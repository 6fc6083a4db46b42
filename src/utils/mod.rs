//! Utility modules for the dispatch engine
//!
//! - **error**: crate-wide error type
//! - **logging**: `tracing` subscriber setup
//! - **validation**: recipient address checks

pub mod error;
pub mod logging;
pub mod validation;
