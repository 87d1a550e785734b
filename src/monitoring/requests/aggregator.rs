//! Request metrics aggregator

use super::exclusions::PathExclusions;
use super::helpers::increment;
use super::types::{LogLevel, RequestLogEntry, RequestMeta};
use crate::config::RequestsConfig;
use crate::monitoring::events::{EventBus, MonitoringEvent};
use crate::monitoring::sink::RecordSink;
use crate::monitoring::status_bucket;
use crate::utils::error::Result;
use crate::utils::generate_id;
use crate::utils::logging::FieldSanitizer;
use crate::utils::time::{SharedClock, elapsed_ms};
use crate::utils::window::{BoundedPush, SlidingWindow};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A request between start and finish
#[derive(Debug)]
pub(super) struct InFlight {
    pub(super) started_at: DateTime<Utc>,
    pub(super) entry: RequestLogEntry,
}

/// Consolidated request state - single lock for history and counters
#[derive(Debug)]
pub(super) struct RequestStorage {
    pub(super) history: VecDeque<RequestLogEntry>,
    pub(super) window: SlidingWindow,
    /// Bounded sample of response times for percentiles
    pub(super) response_times: VecDeque<f64>,
    pub(super) total: u64,
    pub(super) successful: u64,
    pub(super) failed: u64,
    pub(super) slow: u64,
    pub(super) response_time_sum: u64,
    pub(super) by_method: HashMap<String, u64>,
    pub(super) by_path: HashMap<String, u64>,
    pub(super) by_status: HashMap<String, u64>,
}

impl RequestStorage {
    pub(super) fn new(window: SlidingWindow) -> Self {
        Self {
            history: VecDeque::new(),
            window,
            response_times: VecDeque::new(),
            total: 0,
            successful: 0,
            failed: 0,
            slow: 0,
            response_time_sum: 0,
            by_method: HashMap::new(),
            by_path: HashMap::new(),
            by_status: HashMap::new(),
        }
    }
}

/// Times requests and aggregates their outcome
pub struct RequestAggregator {
    pub(super) in_flight: DashMap<String, InFlight>,
    pub(super) storage: Mutex<RequestStorage>,
    exclusions: PathExclusions,
    sanitizer: FieldSanitizer,
    slow_threshold_ms: u64,
    pub(super) history_size: usize,
    pub(super) response_time_samples: usize,
    pub(super) sink: Arc<dyn RecordSink>,
    events: EventBus,
    pub(super) clock: SharedClock,
}

impl RequestAggregator {
    pub fn new(
        config: &RequestsConfig,
        sink: Arc<dyn RecordSink>,
        events: EventBus,
        clock: SharedClock,
    ) -> Result<Self> {
        let window = SlidingWindow::new(
            Duration::from_secs(config.window_secs),
            config.max_window_events,
        );

        Ok(Self {
            in_flight: DashMap::new(),
            storage: Mutex::new(RequestStorage::new(window)),
            exclusions: PathExclusions::new(&config.exclude_paths, &config.exclude_patterns)?,
            sanitizer: FieldSanitizer::new(&config.sensitive_fields, config.max_body_bytes),
            slow_threshold_ms: config.slow_threshold_ms,
            history_size: config.history_size,
            response_time_samples: config.response_time_samples,
            sink,
            events,
            clock,
        })
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclusions.is_excluded(path)
    }

    /// Begin timing a request; excluded paths return `None`
    pub fn on_request_start(&self, meta: RequestMeta) -> Option<String> {
        if self.is_excluded(&meta.path) {
            return None;
        }

        let now = self.clock.now();
        let id = match meta.request_id {
            Some(id) if !id.is_empty() && !self.in_flight.contains_key(&id) => id,
            _ => generate_id(now),
        };

        let query = meta
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(|q| self.sanitizer.sanitize_query(q));
        let headers = self.sanitizer.sanitize_headers(
            meta.headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );

        let entry = RequestLogEntry {
            id: id.clone(),
            timestamp: now,
            method: meta.method,
            path: meta.path,
            query,
            body: meta
                .body
                .filter(|b| !b.is_empty())
                .map(|b| self.sanitizer.sanitize_body(&b)),
            headers,
            ip: meta.ip.unwrap_or_else(|| "unknown".to_string()),
            user_agent: meta.user_agent,
            user_id: meta.user_id,
            session_id: meta.session_id,
            status_code: None,
            response_time_ms: None,
            response_size_bytes: None,
            error: None,
            level: LogLevel::Info,
        };

        self.in_flight.insert(
            id.clone(),
            InFlight {
                started_at: now,
                entry,
            },
        );
        Some(id)
    }

    /// Attach failure text to an in-flight request
    pub fn record_error(&self, request_id: &str, message: impl Into<String>) -> bool {
        match self.in_flight.get_mut(request_id) {
            Some(mut in_flight) => {
                in_flight.entry.error = Some(message.into());
                true
            }
            None => false,
        }
    }

    /// Finalize a request and fold it into the metrics
    pub async fn on_request_finish(
        &self,
        request_id: &str,
        status_code: u16,
        response_size_bytes: Option<u64>,
    ) -> Option<RequestLogEntry> {
        let (_, in_flight) = self.in_flight.remove(request_id)?;
        let now = self.clock.now();
        let response_time_ms = elapsed_ms(in_flight.started_at, now);

        let mut entry = in_flight.entry;
        entry.status_code = Some(status_code);
        entry.response_time_ms = Some(response_time_ms);
        entry.response_size_bytes = response_size_bytes;
        entry.level = LogLevel::from_status(status_code);

        let slow = response_time_ms > self.slow_threshold_ms;
        if slow {
            warn!(
                request_id = %entry.id,
                method = %entry.method,
                path = %entry.path,
                response_time_ms,
                "Slow request: {} {} took {}ms",
                entry.method,
                entry.path,
                response_time_ms
            );
        }

        {
            let mut storage = self.storage.lock();
            storage.total += 1;
            if status_code < 400 {
                storage.successful += 1;
            } else {
                storage.failed += 1;
            }
            if slow {
                storage.slow += 1;
            }
            storage.response_time_sum += response_time_ms;
            storage
                .response_times
                .push_bounded(response_time_ms as f64, self.response_time_samples);
            increment(&mut storage.by_method, entry.method.clone());
            increment(&mut storage.by_path, entry.path.clone());
            increment(&mut storage.by_status, status_bucket(status_code));
            storage.window.record(now);
            storage.history.push_bounded(entry.clone(), self.history_size);
        }

        debug!(
            request_id = %entry.id,
            status_code,
            response_time_ms,
            "{} {} completed",
            entry.method,
            entry.path
        );

        if let Err(e) = self.sink.persist_request_log(&entry).await {
            warn!("Failed to persist request log {}: {}", entry.id, e);
        }

        self.events.publish(MonitoringEvent::RequestCompleted {
            id: entry.id.clone(),
            method: entry.method.clone(),
            path: entry.path.clone(),
            status_code,
            response_time_ms,
            timestamp: now,
        });

        Some(entry)
    }
}

impl std::fmt::Debug for RequestAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAggregator")
            .field("in_flight", &self.in_flight.len())
            .field("exclusions", &self.exclusions)
            .field("slow_threshold_ms", &self.slow_threshold_ms)
            .field("history_size", &self.history_size)
            .finish()
    }
}
