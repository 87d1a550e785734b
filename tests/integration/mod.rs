//! Integration tests for opsgate
//!
//! These tests exercise the public API across component boundaries.

pub mod config_tests;
pub mod error_recovery_tests;
pub mod health_rollup_tests;
pub mod request_metrics_tests;
