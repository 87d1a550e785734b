//! Timeout protection for probes and recovery strategies

use crate::utils::error::{OpsError, Result};
use std::time::Duration;

/// Timeout wrapper for async operations
#[derive(Debug, Clone, Copy)]
pub struct TimeoutWrapper {
    timeout: Duration,
}

impl TimeoutWrapper {
    /// Create a new timeout wrapper
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Deadline applied to wrapped futures
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute a future with timeout protection
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: std::future::Future<Output = R>,
    {
        match tokio::time::timeout(self.timeout, f).await {
            Ok(result) => Ok(result),
            Err(_) => Err(OpsError::Timeout(format!(
                "Operation timed out after {:?}",
                self.timeout
            ))),
        }
    }

    /// Run a future under an optional deadline
    pub async fn maybe<F, R>(timeout: Option<Duration>, f: F) -> Result<R>
    where
        F: std::future::Future<Output = R>,
    {
        match timeout {
            Some(timeout) => Self::new(timeout).call(f).await,
            None => Ok(f.await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_wrapper_success() {
        let wrapper = TimeoutWrapper::new(Duration::from_secs(1));
        let result = wrapper.call(async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_wrapper_timeout() {
        let wrapper = TimeoutWrapper::new(Duration::from_millis(20));
        let result = wrapper
            .call(async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                42
            })
            .await;
        assert!(matches!(result, Err(OpsError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_maybe_without_deadline_runs_to_completion() {
        let result = TimeoutWrapper::maybe(None, async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            "done"
        })
        .await;
        assert_eq!(result.unwrap(), "done");
    }
}
