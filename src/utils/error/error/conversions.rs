//! Type conversions for OpsError

use super::types::OpsError;
use crate::monitoring::errors::Failure;
use std::error::Error as _;

// Typed errors keep their taxonomy when handed to the classifier
impl From<&OpsError> for Failure {
    fn from(err: &OpsError) -> Self {
        let mut failure = Failure::new(err.to_string())
            .with_code(err.code())
            .with_status_code(err.status_code())
            .with_severity(err.severity())
            .with_category(err.category());

        if let Some(secs) = err.retry_after_secs() {
            failure = failure.with_retry_after(secs);
        }

        // Render the source chain as the "stack" of the failure
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        if !chain.is_empty() {
            failure = failure.with_stack(chain.join("\ncaused by: "));
        }

        failure
    }
}

impl From<OpsError> for Failure {
    fn from(err: OpsError) -> Self {
        Failure::from(&err)
    }
}

impl From<tokio::task::JoinError> for OpsError {
    fn from(err: tokio::task::JoinError) -> Self {
        OpsError::Internal(format!("Background task failed: {}", err))
    }
}
