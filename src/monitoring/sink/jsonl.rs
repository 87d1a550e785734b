//! Append-only JSON lines sink

use super::{ErrorLogFilter, RecordSink, RequestLogFilter, select};
use crate::monitoring::errors::ErrorRecord;
use crate::monitoring::requests::RequestLogEntry;
use crate::utils::error::{OpsError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const ERRORS_FILE: &str = "errors.jsonl";
const REQUESTS_FILE: &str = "requests.jsonl";

/// Writes one JSON document per line to `errors.jsonl` and `requests.jsonl`
#[derive(Debug)]
pub struct JsonlSink {
    errors_path: PathBuf,
    requests_path: PathBuf,
    // Serializes appends so lines never interleave
    write_lock: Mutex<()>,
}

impl JsonlSink {
    /// Use `dir` for the log files, creating it when missing
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            OpsError::Sink(format!("Failed to create sink directory {:?}: {}", dir, e))
        })?;
        debug!("JSONL sink writing to {:?}", dir);

        Ok(Self {
            errors_path: dir.join(ERRORS_FILE),
            requests_path: dir.join(REQUESTS_FILE),
            write_lock: Mutex::new(()),
        })
    }

    pub fn errors_path(&self) -> &Path {
        &self.errors_path
    }

    pub fn requests_path(&self) -> &Path {
        &self.requests_path
    }

    async fn append<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let mut line = serde_json::to_string(value)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| OpsError::Sink(format!("Failed to open {:?}: {}", path, e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| OpsError::Sink(format!("Failed to write {:?}: {}", path, e)))?;
        file.flush()
            .await
            .map_err(|e| OpsError::Sink(format!("Failed to flush {:?}: {}", path, e)))?;
        Ok(())
    }

    async fn read_all<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(OpsError::Sink(format!("Failed to read {:?}: {}", path, e))),
        };

        let mut items = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping malformed line {} in {:?}: {}", index + 1, path, e),
            }
        }
        Ok(items)
    }
}

#[async_trait::async_trait]
impl RecordSink for JsonlSink {
    async fn persist_error(&self, record: &ErrorRecord) -> Result<()> {
        self.append(&self.errors_path, record).await
    }

    async fn persist_request_log(&self, entry: &RequestLogEntry) -> Result<()> {
        self.append(&self.requests_path, entry).await
    }

    async fn error_logs(&self, filter: &ErrorLogFilter) -> Result<Vec<ErrorRecord>> {
        let records: Vec<ErrorRecord> = self.read_all(&self.errors_path).await?;
        Ok(select(records.iter(), |r| filter.matches(r), filter.limit))
    }

    async fn request_logs(&self, filter: &RequestLogFilter) -> Result<Vec<RequestLogEntry>> {
        let entries: Vec<RequestLogEntry> = self.read_all(&self.requests_path).await?;
        Ok(select(entries.iter(), |e| filter.matches(e), filter.limit))
    }
}
