//! Bounded in-process record sink

use super::{ErrorLogFilter, RecordSink, RequestLogFilter, select};
use crate::monitoring::errors::ErrorRecord;
use crate::monitoring::requests::RequestLogEntry;
use crate::utils::error::Result;
use crate::utils::window::BoundedPush;
use parking_lot::RwLock;
use std::collections::VecDeque;

/// Keeps the most recent records of each kind in memory
#[derive(Debug)]
pub struct MemorySink {
    max_records: usize,
    errors: RwLock<VecDeque<ErrorRecord>>,
    requests: RwLock<VecDeque<RequestLogEntry>>,
}

impl MemorySink {
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records,
            errors: RwLock::new(VecDeque::new()),
            requests: RwLock::new(VecDeque::new()),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.read().len()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }
}

#[async_trait::async_trait]
impl RecordSink for MemorySink {
    async fn persist_error(&self, record: &ErrorRecord) -> Result<()> {
        self.errors
            .write()
            .push_bounded(record.clone(), self.max_records);
        Ok(())
    }

    async fn persist_request_log(&self, entry: &RequestLogEntry) -> Result<()> {
        self.requests
            .write()
            .push_bounded(entry.clone(), self.max_records);
        Ok(())
    }

    async fn error_logs(&self, filter: &ErrorLogFilter) -> Result<Vec<ErrorRecord>> {
        let errors = self.errors.read();
        Ok(select(errors.iter(), |r| filter.matches(r), filter.limit))
    }

    async fn request_logs(&self, filter: &RequestLogFilter) -> Result<Vec<RequestLogEntry>> {
        let requests = self.requests.read();
        Ok(select(requests.iter(), |e| filter.matches(e), filter.limit))
    }
}
