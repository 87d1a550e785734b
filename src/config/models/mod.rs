//! Configuration data models
//!
//! This module defines all configuration structures used throughout the service.

#![allow(missing_docs)]

pub mod errors;
pub mod health;
pub mod logging;
pub mod requests;
pub mod server;
pub mod sink;

// Re-export all configuration types
pub use errors::*;
pub use health::*;
pub use logging::*;
pub use requests::*;
pub use server::*;
pub use sink::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default deployment environment
pub fn default_environment() -> String {
    "development".to_string()
}

/// Default health snapshot cache TTL in seconds
pub fn default_cache_ttl_secs() -> u64 {
    5
}

/// Default number of health results kept in history
pub fn default_health_history_size() -> usize {
    100
}

/// Default periodic health check interval in seconds
pub fn default_check_interval_secs() -> u64 {
    30
}

/// Default timeout for built-in HTTP and TCP probes
pub fn default_probe_check_timeout_ms() -> u64 {
    5_000
}

/// Default number of records kept in error and request histories
pub fn default_history_size() -> usize {
    1_000
}

/// Default sliding window span in seconds
pub fn default_window_secs() -> u64 {
    60
}

/// Default cap on timestamps held by a sliding window
pub fn default_max_window_events() -> usize {
    100_000
}

pub fn default_slow_threshold_ms() -> u64 {
    1_000
}

pub fn default_response_time_samples() -> usize {
    10_000
}

pub fn default_max_body_bytes() -> usize {
    10 * 1024 // 10KB
}

pub fn default_exclude_paths() -> Vec<String> {
    vec!["/health/live".to_string(), "/favicon.ico".to_string()]
}

pub fn default_sensitive_fields() -> Vec<String> {
    [
        "password",
        "token",
        "secret",
        "authorization",
        "cookie",
        "api_key",
        "apikey",
        "credit_card",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_sink_max_records() -> usize {
    10_000
}

pub fn default_notifier_timeout_secs() -> u64 {
    10
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
