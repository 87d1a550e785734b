//! Reusable recovery strategies

use super::recovery::RecoveryStrategy;
use super::types::{ErrorCategory, ErrorRecord, RequestContext};
use crate::utils::error::{Result, RetryPolicy};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

type Condition = Arc<dyn Fn(&ErrorRecord) -> bool + Send + Sync>;
type RecoverFn = Arc<dyn Fn(ErrorRecord, RequestContext) -> BoxFuture<'static, Result<bool>> + Send + Sync>;
type Operation = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Strategy built from a condition and an async closure
#[derive(Clone)]
pub struct FnStrategy {
    name: String,
    condition: Condition,
    recover: RecoverFn,
}

impl FnStrategy {
    pub fn new<C, F, Fut>(name: impl Into<String>, condition: C, recover: F) -> Self
    where
        C: Fn(&ErrorRecord) -> bool + Send + Sync + 'static,
        F: Fn(ErrorRecord, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Self {
            name: name.into(),
            condition: Arc::new(condition),
            recover: Arc::new(move |error: ErrorRecord, ctx: RequestContext| {
                recover(error, ctx).boxed()
            }),
        }
    }

    /// Strategy applying to every error of one category
    pub fn for_category<F, Fut>(name: impl Into<String>, category: ErrorCategory, recover: F) -> Self
    where
        F: Fn(ErrorRecord, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Self::new(name, move |error| error.category == category, recover)
    }
}

#[async_trait::async_trait]
impl RecoveryStrategy for FnStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, error: &ErrorRecord) -> bool {
        (self.condition)(error)
    }

    async fn recover(&self, error: &ErrorRecord, ctx: &RequestContext) -> Result<bool> {
        (self.recover)(error.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for FnStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStrategy").field("name", &self.name).finish()
    }
}

/// Re-runs an operation under exponential backoff.
///
/// Recovers when the operation eventually succeeds; reports "not recovered"
/// once the policy gives up.
#[derive(Clone)]
pub struct RetryStrategy {
    name: String,
    condition: Condition,
    operation: Operation,
    policy: RetryPolicy,
}

impl RetryStrategy {
    pub fn new<C, F, Fut>(name: impl Into<String>, condition: C, operation: F, policy: RetryPolicy) -> Self
    where
        C: Fn(&ErrorRecord) -> bool + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            condition: Arc::new(condition),
            operation: Arc::new(move || operation().boxed()),
            policy,
        }
    }

    /// `database_reconnect`: retry a reconnect operation for database errors.
    ///
    /// Applies to errors classified as DATABASE and to any error whose
    /// message mentions "database", whatever category it was given.
    pub fn database_reconnect<F, Fut>(reconnect: F, policy: RetryPolicy) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::new(
            "database_reconnect",
            |error| {
                error.category == ErrorCategory::Database
                    || error.message.to_lowercase().contains("database")
            },
            reconnect,
            policy,
        )
    }
}

#[async_trait::async_trait]
impl RecoveryStrategy for RetryStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, error: &ErrorRecord) -> bool {
        (self.condition)(error)
    }

    async fn recover(&self, error: &ErrorRecord, _ctx: &RequestContext) -> Result<bool> {
        let operation = Arc::clone(&self.operation);
        match self.policy.call(|| operation()).await {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!("'{}' exhausted retries for {}: {}", self.name, error.id, e);
                Ok(false)
            }
        }
    }
}

impl std::fmt::Debug for RetryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryStrategy")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .finish()
    }
}
