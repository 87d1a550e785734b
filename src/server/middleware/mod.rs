//! HTTP middleware implementations
//!
//! - Request ID propagation
//! - Request timing through the request aggregator
//! - Error capture, classification and recovery

mod error_capture;
mod helpers;
mod metrics;
mod request_id;

#[cfg(test)]
mod tests;

pub use error_capture::{ErrorCaptureMiddleware, ErrorCaptureMiddlewareService};
pub use helpers::{
    TrackedRequest, X_REQUEST_ID, X_SESSION_ID, X_USER_ID, failure_from_error, is_textual,
    request_context, request_meta,
};
pub use metrics::{MetricsMiddleware, MetricsMiddlewareService};
pub use request_id::{RequestIdMiddleware, RequestIdMiddlewareService};
