//! Request metrics
//!
//! Every tracked request is timed from start to finish, sanitized, and folded
//! into counters, a bounded history and a sliding requests-per-minute window.

mod aggregator;
mod exclusions;
mod getters;
mod helpers;
mod types;


pub use aggregator::RequestAggregator;
pub use exclusions::PathExclusions;
pub use types::{LogLevel, RequestLogEntry, RequestMeta, RequestMetrics};
