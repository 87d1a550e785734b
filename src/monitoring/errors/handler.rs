//! Error handling pipeline

use super::classifier::ErrorClassifier;
use super::recovery::{RecoveryChain, RecoveryStrategy};
use super::types::{
    ErrorCategory, ErrorRecord, ErrorSeverity, ErrorStatistics, Failure, RequestContext,
};
use crate::config::ErrorsConfig;
use crate::monitoring::events::{EventBus, MonitoringEvent};
use crate::monitoring::sink::{CriticalNotifier, RecordSink};
use crate::monitoring::status_bucket;
use crate::utils::error::Result;
use crate::utils::time::SharedClock;
use crate::utils::window::{BoundedPush, SlidingWindow, tail};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Consolidated error state - single lock for history and counters
#[derive(Debug)]
struct ErrorStorage {
    history: VecDeque<ErrorRecord>,
    window: SlidingWindow,
    total: u64,
    critical: u64,
    recovered: u64,
    by_category: HashMap<String, u64>,
    by_severity: HashMap<String, u64>,
    by_status: HashMap<String, u64>,
}

impl ErrorStorage {
    fn record(&mut self, record: &ErrorRecord, history_size: usize) {
        self.history.push_bounded(record.clone(), history_size);
        self.window.record(record.timestamp);

        self.total += 1;
        if record.is_critical() {
            self.critical += 1;
        }
        if record.recovered {
            self.recovered += 1;
        }
        *self
            .by_category
            .entry(record.category.as_str().to_string())
            .or_insert(0) += 1;
        *self
            .by_severity
            .entry(record.severity.as_str().to_string())
            .or_insert(0) += 1;
        *self
            .by_status
            .entry(status_bucket(record.status_code))
            .or_insert(0) += 1;
    }
}

/// Classifies failures, runs recovery, and reports the outcome
pub struct ErrorHandler {
    classifier: RwLock<ErrorClassifier>,
    recovery: RecoveryChain,
    storage: Mutex<ErrorStorage>,
    history_size: usize,
    window_secs: u64,
    sink: Arc<dyn RecordSink>,
    notifiers: Vec<Arc<dyn CriticalNotifier>>,
    events: EventBus,
    clock: SharedClock,
}

impl ErrorHandler {
    pub fn new(
        config: &ErrorsConfig,
        sink: Arc<dyn RecordSink>,
        notifiers: Vec<Arc<dyn CriticalNotifier>>,
        events: EventBus,
        clock: SharedClock,
    ) -> Self {
        let window = SlidingWindow::new(
            Duration::from_secs(config.window_secs),
            config.max_window_events,
        );

        Self {
            classifier: RwLock::new(ErrorClassifier::new(clock.clone())),
            recovery: RecoveryChain::new(config.strategy_timeout_ms.map(Duration::from_millis)),
            storage: Mutex::new(ErrorStorage {
                history: VecDeque::new(),
                window,
                total: 0,
                critical: 0,
                recovered: 0,
                by_category: HashMap::new(),
                by_severity: HashMap::new(),
                by_status: HashMap::new(),
            }),
            history_size: config.history_size,
            window_secs: config.window_secs,
            sink,
            notifiers,
            events,
            clock,
        }
    }

    /// Classify without recording anything
    pub fn classify(&self, failure: &Failure, ctx: &RequestContext) -> ErrorRecord {
        self.classifier.read().classify(failure, ctx)
    }

    /// Add a message pattern after the built-in ones
    pub fn add_category_rule(&self, pattern: &str, category: ErrorCategory) -> Result<()> {
        self.classifier.write().add_rule(pattern, category)
    }

    /// Append a recovery strategy; strategies run in registration order
    pub fn register_recovery_strategy(&self, strategy: Arc<dyn RecoveryStrategy>) {
        self.recovery.register(strategy);
    }

    pub fn recovery_strategies(&self) -> Vec<String> {
        self.recovery.names()
    }

    /// Run the recovery chain against an already classified error.
    /// Critical errors are never recovered.
    pub async fn attempt_recovery(&self, error: &ErrorRecord, ctx: &RequestContext) -> bool {
        self.recovery.attempt(error, ctx).await
    }

    /// Classify, recover, record, persist and report one failure
    pub async fn handle(&self, failure: Failure, ctx: RequestContext) -> ErrorRecord {
        let mut record = self.classify(&failure, &ctx);
        record.recovered = self.attempt_recovery(&record, &ctx).await;

        match record.severity {
            ErrorSeverity::Critical | ErrorSeverity::High => error!(
                error_id = %record.id,
                category = %record.category,
                status_code = record.status_code,
                recovered = record.recovered,
                "{}",
                record.message
            ),
            ErrorSeverity::Medium => warn!(
                error_id = %record.id,
                category = %record.category,
                status_code = record.status_code,
                recovered = record.recovered,
                "{}",
                record.message
            ),
            ErrorSeverity::Low => info!(
                error_id = %record.id,
                category = %record.category,
                status_code = record.status_code,
                "{}",
                record.message
            ),
        }

        self.storage.lock().record(&record, self.history_size);

        if let Err(e) = self.sink.persist_error(&record).await {
            warn!("Failed to persist error {}: {}", record.id, e);
        }

        if record.is_critical() {
            for notifier in &self.notifiers {
                if let Err(e) = notifier.notify_critical(&record).await {
                    warn!(
                        "Critical notifier '{}' failed for {}: {}",
                        notifier.name(),
                        record.id,
                        e
                    );
                }
            }
        }

        self.events.publish(MonitoringEvent::ErrorHandled {
            id: record.id.clone(),
            severity: record.severity,
            category: record.category,
            status_code: record.status_code,
            recovered: record.recovered,
            timestamp: record.timestamp,
        });

        record
    }

    /// Lifetime counters plus the trailing-window error rate
    pub fn statistics(&self) -> ErrorStatistics {
        let now = self.clock.now();
        let mut storage = self.storage.lock();
        let error_rate = storage.window.count(now);

        ErrorStatistics {
            total_errors: storage.total,
            by_category: storage.by_category.clone(),
            by_severity: storage.by_severity.clone(),
            by_status: storage.by_status.clone(),
            critical_errors: storage.critical,
            recovered_errors: storage.recovered,
            error_rate,
            window_secs: self.window_secs,
            history_size: storage.history.len(),
        }
    }

    /// Most recent records, oldest first
    pub fn recent(&self, limit: usize) -> Vec<ErrorRecord> {
        tail(&self.storage.lock().history, limit)
    }

    pub fn sink(&self) -> &Arc<dyn RecordSink> {
        &self.sink
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("recovery", &self.recovery)
            .field("history_size", &self.history_size)
            .field("sink", &self.sink)
            .field("notifiers", &self.notifiers.len())
            .finish()
    }
}
