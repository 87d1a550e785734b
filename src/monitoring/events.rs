//! Monitoring event bus

use crate::monitoring::errors::{ErrorCategory, ErrorSeverity};
use crate::monitoring::health::HealthState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// Default number of events buffered per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Something observable happened inside the monitoring system
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitoringEvent {
    /// A health aggregation pass completed
    HealthChecked {
        status: HealthState,
        checks: usize,
        failed_critical: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    /// A failure went through classification and recovery
    ErrorHandled {
        id: String,
        severity: ErrorSeverity,
        category: ErrorCategory,
        status_code: u16,
        recovered: bool,
        timestamp: DateTime<Utc>,
    },
    /// A tracked request finished
    RequestCompleted {
        id: String,
        method: String,
        path: String,
        status_code: u16,
        response_time_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast channel of [`MonitoringEvent`]s
///
/// Publishing never fails: events sent while nobody listens are dropped, and
/// slow subscribers observe a lag instead of blocking publishers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MonitoringEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<MonitoringEvent> {
        self.sender.subscribe()
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, event: MonitoringEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!("Monitoring event dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
