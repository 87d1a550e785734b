//! Record sink and critical notifier configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Where error and request logs are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Bounded in-process store
    #[default]
    Memory,
    /// Append-only JSON lines files
    File,
    /// Discard everything
    None,
}

/// Record sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub kind: SinkKind,
    /// Directory for the JSON lines files (file sink only)
    #[serde(default)]
    pub path: Option<String>,
    /// Records kept per log type by the memory sink
    #[serde(default = "default_sink_max_records")]
    pub max_records: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            path: None,
            max_records: default_sink_max_records(),
        }
    }
}

impl SinkConfig {
    /// Merge sink configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.kind != SinkKind::default() {
            self.kind = other.kind;
        }
        if other.path.is_some() {
            self.path = other.path;
        }
        if other.max_records != default_sink_max_records() {
            self.max_records = other.max_records;
        }
        self
    }
}

/// Critical error notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Send critical errors to the log
    #[serde(default = "default_true")]
    pub log: bool,
    /// Webhook receiving critical errors as JSON
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Webhook request timeout in seconds
    #[serde(default = "default_notifier_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            log: true,
            webhook_url: None,
            timeout_secs: default_notifier_timeout_secs(),
        }
    }
}

impl NotifierConfig {
    /// Merge notifier configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.log {
            self.log = other.log;
        }
        if other.webhook_url.is_some() {
            self.webhook_url = other.webhook_url;
        }
        if other.timeout_secs != default_notifier_timeout_secs() {
            self.timeout_secs = other.timeout_secs;
        }
        self
    }
}
