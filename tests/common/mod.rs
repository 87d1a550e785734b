//! Common test utilities for opsgate

pub mod fixtures;

pub use fixtures::{monitoring_at, probe, start_time};
