//! Single-value cache with time-to-live expiry

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

struct Entry<T> {
    value: Arc<T>,
    expires_at: DateTime<Utc>,
}

/// Memoizes one computed value for a fixed duration.
///
/// Reads and writes are atomic pointer swaps, so a reader observes either the
/// previous value or the new one. A TTL of zero disables caching entirely.
pub struct TtlCache<T> {
    ttl: Duration,
    entry: ArcSwapOption<Entry<T>>,
}

impl<T> TtlCache<T> {
    /// Create an empty cache
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500)),
            entry: ArcSwapOption::empty(),
        }
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether this cache stores anything at all
    pub fn is_enabled(&self) -> bool {
        self.ttl > Duration::zero()
    }

    /// Cached value, if one exists and has not expired at `now`
    pub fn get(&self, now: DateTime<Utc>) -> Option<Arc<T>> {
        let guard = self.entry.load();
        match guard.as_ref() {
            Some(entry) if now < entry.expires_at => Some(Arc::clone(&entry.value)),
            _ => None,
        }
    }

    /// Last stored value regardless of expiry
    pub fn peek(&self) -> Option<Arc<T>> {
        self.entry.load().as_ref().map(|entry| Arc::clone(&entry.value))
    }

    /// Store a value computed at `now` and hand it back
    pub fn set(&self, value: T, now: DateTime<Utc>) -> Arc<T> {
        let value = Arc::new(value);
        self.entry.store(Some(Arc::new(Entry {
            value: Arc::clone(&value),
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })));
        value
    }

    /// Drop the cached value
    pub fn invalidate(&self) {
        self.entry.store(None);
    }
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("populated", &self.entry.load().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_within_ttl_returns_same_arc() {
        let cache = TtlCache::new(std::time::Duration::from_secs(5));
        let now = Utc::now();
        let stored = cache.set("snapshot".to_string(), now);

        let hit = cache.get(now + Duration::seconds(4)).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
    }

    #[test]
    fn test_get_after_ttl_misses() {
        let cache = TtlCache::new(std::time::Duration::from_secs(5));
        let now = Utc::now();
        cache.set(1u32, now);

        assert!(cache.get(now + Duration::seconds(5)).is_none());
        assert!(cache.peek().is_some());
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = TtlCache::new(std::time::Duration::ZERO);
        let now = Utc::now();
        cache.set(1u32, now);

        assert!(!cache.is_enabled());
        assert!(cache.get(now).is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = TtlCache::new(std::time::Duration::from_secs(60));
        let now = Utc::now();
        cache.set(7u8, now);
        cache.invalidate();
        assert!(cache.get(now).is_none());
        assert!(cache.peek().is_none());
    }
}
