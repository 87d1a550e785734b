//! Error recovery and resilience utilities
//!
//! Retry with exponential backoff and deadline wrappers used by recovery
//! strategies and health probes.

mod resilience;
mod retry;
mod types;

pub use resilience::TimeoutWrapper;
pub use retry::RetryPolicy;
pub use types::RetryConfig;
