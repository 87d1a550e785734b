//! Request metrics configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Request metrics aggregator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestsConfig {
    /// Requests slower than this are logged as slow
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: u64,
    /// Number of finalized request entries retained in history
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    /// Span of the requests-per-minute window in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Cap on timestamps held by the requests-per-minute window. Above
    /// `max_window_events / window_secs` requests per second the count undercounts.
    #[serde(default = "default_max_window_events")]
    pub max_window_events: usize,
    /// Response times kept for percentile calculation
    #[serde(default = "default_response_time_samples")]
    pub response_time_samples: usize,
    /// Paths never timed or counted; a trailing `*` matches a prefix
    #[serde(default = "default_exclude_paths")]
    pub exclude_paths: Vec<String>,
    /// Regex patterns of paths never timed or counted
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Keys redacted from query, body and headers (case-insensitive)
    #[serde(default = "default_sensitive_fields")]
    pub sensitive_fields: Vec<String>,
    /// Bodies above this size are truncated before storage
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for RequestsConfig {
    fn default() -> Self {
        Self {
            slow_threshold_ms: default_slow_threshold_ms(),
            history_size: default_history_size(),
            window_secs: default_window_secs(),
            max_window_events: default_max_window_events(),
            response_time_samples: default_response_time_samples(),
            exclude_paths: default_exclude_paths(),
            exclude_patterns: Vec::new(),
            sensitive_fields: default_sensitive_fields(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl RequestsConfig {
    /// Merge request configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.slow_threshold_ms != default_slow_threshold_ms() {
            self.slow_threshold_ms = other.slow_threshold_ms;
        }
        if other.history_size != default_history_size() {
            self.history_size = other.history_size;
        }
        if other.window_secs != default_window_secs() {
            self.window_secs = other.window_secs;
        }
        if other.max_window_events != default_max_window_events() {
            self.max_window_events = other.max_window_events;
        }
        if other.response_time_samples != default_response_time_samples() {
            self.response_time_samples = other.response_time_samples;
        }
        if other.exclude_paths != default_exclude_paths() {
            self.exclude_paths = other.exclude_paths;
        }
        if !other.exclude_patterns.is_empty() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.sensitive_fields != default_sensitive_fields() {
            self.sensitive_fields = other.sensitive_fields;
        }
        if other.max_body_bytes != default_max_body_bytes() {
            self.max_body_bytes = other.max_body_bytes;
        }
        self
    }
}
