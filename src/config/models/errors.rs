//! Error handler configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Error classification and recovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorsConfig {
    /// Number of error records retained in history
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    /// Span of the error-rate window in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Cap on timestamps held by the error-rate window. Above
    /// `max_window_events / window_secs` errors per second the rate undercounts.
    #[serde(default = "default_max_window_events")]
    pub max_window_events: usize,
    /// Optional deadline for a single recovery strategy
    #[serde(default)]
    pub strategy_timeout_ms: Option<u64>,
    /// Include the stack in client error envelopes (defaults to non-production)
    #[serde(default)]
    pub expose_stack: Option<bool>,
}

impl Default for ErrorsConfig {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
            window_secs: default_window_secs(),
            max_window_events: default_max_window_events(),
            strategy_timeout_ms: None,
            expose_stack: None,
        }
    }
}

impl ErrorsConfig {
    /// Merge error configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.history_size != default_history_size() {
            self.history_size = other.history_size;
        }
        if other.window_secs != default_window_secs() {
            self.window_secs = other.window_secs;
        }
        if other.max_window_events != default_max_window_events() {
            self.max_window_events = other.max_window_events;
        }
        if other.strategy_timeout_ms.is_some() {
            self.strategy_timeout_ms = other.strategy_timeout_ms;
        }
        if other.expose_stack.is_some() {
            self.expose_stack = other.expose_stack;
        }
        self
    }
}
