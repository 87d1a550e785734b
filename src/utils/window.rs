//! Bounded collections: FIFO histories and time-based sliding windows

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use tracing::warn;

/// Helper trait for bounded VecDeque operations
pub trait BoundedPush<T> {
    fn push_bounded(&mut self, value: T, max_size: usize);
}

impl<T> BoundedPush<T> for VecDeque<T> {
    /// Push a value while maintaining a maximum size (O(1) amortized)
    #[inline]
    fn push_bounded(&mut self, value: T, max_size: usize) {
        if max_size == 0 {
            return;
        }
        while self.len() >= max_size {
            self.pop_front();
        }
        self.push_back(value);
    }
}

/// Last `limit` items of a history, oldest first
pub fn tail<T: Clone>(items: &VecDeque<T>, limit: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(limit);
    items.iter().skip(skip).cloned().collect()
}

/// Event timestamps within a trailing time window.
///
/// Timestamps are expected in non-decreasing order. Entries older than the
/// window are dropped lazily when the window is read. At most `max_events`
/// timestamps are held; past that the oldest in-window events are evicted and
/// counts undercount, which is logged once per saturation episode.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    window: Duration,
    max_events: usize,
    events: VecDeque<DateTime<Utc>>,
    saturated: bool,
}

impl SlidingWindow {
    /// Create a window of the given span holding at most `max_events` entries
    pub fn new(window: std::time::Duration, max_events: usize) -> Self {
        Self {
            window: Duration::from_std(window).unwrap_or(Duration::seconds(60)),
            max_events,
            events: VecDeque::new(),
            saturated: false,
        }
    }

    /// Span of the window
    pub fn span(&self) -> Duration {
        self.window
    }

    /// Record one event
    pub fn record(&mut self, at: DateTime<Utc>) {
        if self.max_events > 0 && self.events.len() >= self.max_events {
            self.prune(at);
        }
        if self.max_events > 0 && self.events.len() >= self.max_events {
            if !self.saturated {
                warn!(
                    "Sliding window saturated at {} events; rates will undercount",
                    self.max_events
                );
                self.saturated = true;
            }
        } else {
            self.saturated = false;
        }
        self.events.push_bounded(at, self.max_events);
    }

    /// Whether the last recorded event had to evict an in-window event
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Number of events in `[now - window, now]`, pruning stale entries
    pub fn count(&mut self, now: DateTime<Utc>) -> usize {
        self.prune(now);
        self.events.len()
    }

    /// Drop every event older than the window
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.window;
        while let Some(oldest) = self.events.front() {
            if *oldest < cutoff {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }

    /// Forget every event
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
