//! Integration tests for batch-dispatch
//!
//! These tests drive whole runs through the public API.

pub mod config_tests;
pub mod dispatch_tests;
pub mod rate_limit_tests;
pub mod scenario_tests;
