//! Logging utilities
//!
//! Subscriber initialization and sanitization of request data before it is
//! logged or persisted.

pub mod init;
pub mod sanitization;

pub use init::init_logging;
pub use sanitization::{FieldSanitizer, REDACTED, TRUNCATED};
