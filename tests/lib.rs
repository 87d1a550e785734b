//! Test suite for opsgate
//!
//! ## Test Categories
//!
//! ### 1. Common Utilities (`common/`)
//! Shared fixtures: configurations, probes and monitoring systems on a
//! virtual clock.
//!
//! ### 2. Integration Tests (`integration/`)
//! Tests that drive the public API end to end:
//! - Health rollup through the HTTP endpoints
//! - Error classification and recovery
//! - Request metrics and sliding windows
//! - Configuration loading
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test --all-features
//!
//! # Run integration tests only
//! cargo test --test lib
//! ```

pub mod common;
pub mod integration;
