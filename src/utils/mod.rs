//! Utility modules for opsgate
//!
//! ## Module Organization
//!
//! - **error**: Crate error type, retry and timeout helpers
//! - **logging**: Subscriber setup and request data sanitization
//! - **time**: Clock abstraction for virtual time in tests
//! - **ttl_cache**: Single-value cache with expiry
//! - **window**: Bounded histories and sliding time windows

pub mod error;
pub mod logging;
pub mod time;
pub mod ttl_cache;
pub mod window;

pub use time::{Clock, MockClock, SharedClock, SystemClock};
pub use ttl_cache::TtlCache;
pub use window::{BoundedPush, SlidingWindow};

/// Generate a time-sortable unique identifier for the given instant
pub fn generate_id(at: chrono::DateTime<chrono::Utc>) -> String {
    let secs = at.timestamp().max(0) as u64;
    let nanos = at.timestamp_subsec_nanos();
    uuid::Uuid::new_v7(uuid::Timestamp::from_unix(uuid::NoContext, secs, nanos)).to_string()
}
