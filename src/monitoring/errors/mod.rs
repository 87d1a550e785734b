//! Error classification and recovery
//!
//! Failures are classified into a severity/category taxonomy, run through an
//! ordered chain of recovery strategies, and recorded in a bounded history.

mod classifier;
mod handler;
mod recovery;
mod strategies;
mod types;


pub use classifier::{CategoryRule, DEFAULT_CATEGORY_RULES, ErrorClassifier};
pub use handler::ErrorHandler;
pub use recovery::{RecoveryChain, RecoveryStrategy};
pub use strategies::{FnStrategy, RetryStrategy};
pub use types::{
    ErrorCategory, ErrorRecord, ErrorSeverity, ErrorStatistics, Failure, RequestContext,
};
