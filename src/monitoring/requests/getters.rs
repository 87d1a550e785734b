//! Read access to aggregated request metrics

use super::aggregator::{RequestAggregator, RequestStorage};
use super::helpers::{calculate_average, calculate_percentile};
use super::types::{RequestLogEntry, RequestMetrics};
use crate::monitoring::sink::RecordSink;
use crate::utils::window::tail;
use std::sync::Arc;

impl RequestAggregator {
    /// Counters, percentiles and the trailing-window request rate
    pub fn metrics(&self) -> RequestMetrics {
        let now = self.clock.now();
        let mut storage = self.storage.lock();
        let requests_per_minute = storage.window.count(now);

        let mut sorted: Vec<f64> = storage.response_times.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        RequestMetrics {
            total_requests: storage.total,
            successful_requests: storage.successful,
            failed_requests: storage.failed,
            average_response_time_ms: calculate_average(storage.response_time_sum, storage.total),
            p95_response_time_ms: calculate_percentile(&sorted, 0.95),
            p99_response_time_ms: calculate_percentile(&sorted, 0.99),
            slow_requests: storage.slow,
            requests_per_minute,
            in_flight: self.in_flight.len(),
            by_method: storage.by_method.clone(),
            by_path: storage.by_path.clone(),
            by_status: storage.by_status.clone(),
        }
    }

    /// Most recent finalized requests, oldest first
    pub fn history(&self, limit: usize) -> Vec<RequestLogEntry> {
        tail(&self.storage.lock().history, limit)
    }

    #[inline]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Drop every counter and the history; in-flight requests are kept
    pub fn reset(&self) {
        let mut storage = self.storage.lock();
        let mut window = storage.window.clone();
        window.clear();
        *storage = RequestStorage::new(window);
    }

    pub fn sink(&self) -> &Arc<dyn RecordSink> {
        &self.sink
    }
}
