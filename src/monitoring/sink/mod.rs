//! Persistence and notification collaborators
//!
//! The monitoring core only talks to these traits. Failures reported by an
//! implementation are logged by the caller and never roll back in-memory
//! state.

mod jsonl;
mod memory;
mod notifier;


pub use jsonl::JsonlSink;
pub use memory::MemorySink;
pub use notifier::{LogNotifier, WebhookNotifier};

use crate::config::{NotifierConfig, SinkConfig, SinkKind};
use crate::monitoring::errors::{ErrorCategory, ErrorRecord, ErrorSeverity};
use crate::monitoring::requests::{LogLevel, RequestLogEntry};
use crate::utils::error::{OpsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Persists error and request logs
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync + std::fmt::Debug {
    async fn persist_error(&self, record: &ErrorRecord) -> Result<()>;

    async fn persist_request_log(&self, entry: &RequestLogEntry) -> Result<()>;

    /// Stored error records matching the filter, oldest first
    async fn error_logs(&self, filter: &ErrorLogFilter) -> Result<Vec<ErrorRecord>>;

    /// Stored request logs matching the filter, oldest first
    async fn request_logs(&self, filter: &RequestLogFilter) -> Result<Vec<RequestLogEntry>>;
}

/// Side channel for errors that must reach an operator
#[async_trait::async_trait]
pub trait CriticalNotifier: Send + Sync + std::fmt::Debug {
    async fn notify_critical(&self, record: &ErrorRecord) -> Result<()>;

    fn name(&self) -> &str;
}

/// Query over stored error records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorLogFilter {
    pub severity: Option<ErrorSeverity>,
    pub category: Option<ErrorCategory>,
    pub recovered: Option<bool>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    /// Keep only the most recent matches
    pub limit: Option<usize>,
}

impl ErrorLogFilter {
    pub fn matches(&self, record: &ErrorRecord) -> bool {
        self.severity.is_none_or(|s| record.severity == s)
            && self.category.is_none_or(|c| record.category == c)
            && self.recovered.is_none_or(|r| record.recovered == r)
            && self.since.is_none_or(|t| record.timestamp >= t)
            && self.until.is_none_or(|t| record.timestamp <= t)
    }
}

/// Query over stored request logs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestLogFilter {
    pub method: Option<String>,
    pub path: Option<String>,
    pub level: Option<LogLevel>,
    pub min_status: Option<u16>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    /// Keep only the most recent matches
    pub limit: Option<usize>,
}

impl RequestLogFilter {
    pub fn matches(&self, entry: &RequestLogEntry) -> bool {
        self.method
            .as_deref()
            .is_none_or(|m| entry.method.eq_ignore_ascii_case(m))
            && self.path.as_deref().is_none_or(|p| entry.path == p)
            && self.level.is_none_or(|l| entry.level == l)
            && self
                .min_status
                .is_none_or(|s| entry.status_code.is_some_and(|code| code >= s))
            && self.since.is_none_or(|t| entry.timestamp >= t)
            && self.until.is_none_or(|t| entry.timestamp <= t)
    }
}

/// Apply a filter and its limit to records held oldest first
pub(crate) fn select<'a, T, I>(items: I, matches: impl Fn(&T) -> bool, limit: Option<usize>) -> Vec<T>
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut selected: Vec<T> = items.into_iter().filter(|item| matches(*item)).cloned().collect();
    if let Some(limit) = limit {
        let skip = selected.len().saturating_sub(limit);
        selected.drain(..skip);
    }
    selected
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait::async_trait]
impl RecordSink for NoopSink {
    async fn persist_error(&self, _record: &ErrorRecord) -> Result<()> {
        Ok(())
    }

    async fn persist_request_log(&self, _entry: &RequestLogEntry) -> Result<()> {
        Ok(())
    }

    async fn error_logs(&self, _filter: &ErrorLogFilter) -> Result<Vec<ErrorRecord>> {
        Ok(Vec::new())
    }

    async fn request_logs(&self, _filter: &RequestLogFilter) -> Result<Vec<RequestLogEntry>> {
        Ok(Vec::new())
    }
}

/// Build the configured record sink
pub async fn build_sink(config: &SinkConfig) -> Result<Arc<dyn RecordSink>> {
    let sink: Arc<dyn RecordSink> = match config.kind {
        SinkKind::Memory => Arc::new(MemorySink::new(config.max_records)),
        SinkKind::None => Arc::new(NoopSink),
        SinkKind::File => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| OpsError::Config("File sink requires a path".to_string()))?;
            Arc::new(JsonlSink::open(path).await?)
        }
    };
    Ok(sink)
}

/// Build the configured critical notifiers
pub fn build_notifiers(config: &NotifierConfig) -> Result<Vec<Arc<dyn CriticalNotifier>>> {
    let mut notifiers: Vec<Arc<dyn CriticalNotifier>> = Vec::new();
    if config.log {
        notifiers.push(Arc::new(LogNotifier));
    }
    if let Some(url) = &config.webhook_url {
        notifiers.push(Arc::new(WebhookNotifier::new(
            url.clone(),
            std::time::Duration::from_secs(config.timeout_secs),
        )?));
    }
    Ok(notifiers)
}
