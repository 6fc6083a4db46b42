//! Configuration validation
//!
//! - `trait_def`: the Validate trait
//! - `batch_validators`: batch options and rate limit validators
//! - `config_validators`: logging and top-level config validators
//! - `tests`: test suite for all validators

mod batch_validators;
mod config_validators;
mod trait_def;

pub use trait_def::Validate;
