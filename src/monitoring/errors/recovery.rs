//! Ordered recovery strategies

use super::types::{ErrorRecord, RequestContext};
use crate::monitoring::panic_message;
use crate::utils::error::{Result, TimeoutWrapper};
use futures::FutureExt;
use parking_lot::RwLock;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// An automated attempt to recover from a classified failure
#[async_trait::async_trait]
pub trait RecoveryStrategy: Send + Sync {
    /// Unique strategy name
    fn name(&self) -> &str;

    /// Whether this strategy should run for the error
    fn applies_to(&self, error: &ErrorRecord) -> bool;

    /// Try to recover; `Ok(true)` means the failure is resolved
    async fn recover(&self, error: &ErrorRecord, ctx: &RequestContext) -> Result<bool>;
}

/// Runs strategies in registration order until one recovers
#[derive(Default)]
pub struct RecoveryChain {
    strategies: RwLock<Vec<Arc<dyn RecoveryStrategy>>>,
    timeout: Option<Duration>,
}

impl RecoveryChain {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            strategies: RwLock::new(Vec::new()),
            timeout,
        }
    }

    /// Append a strategy
    pub fn register(&self, strategy: Arc<dyn RecoveryStrategy>) {
        let mut strategies = self.strategies.write();
        if strategies.iter().any(|s| s.name() == strategy.name()) {
            warn!(
                "Recovery strategy '{}' registered more than once",
                strategy.name()
            );
        }
        debug!("Registered recovery strategy '{}'", strategy.name());
        strategies.push(strategy);
    }

    pub fn names(&self) -> Vec<String> {
        self.strategies
            .read()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.read().is_empty()
    }

    /// Run matching strategies sequentially.
    ///
    /// `Ok(true)` stops the chain. `Ok(false)`, an error, a panic or a missed
    /// deadline move on to the next matching strategy.
    pub async fn attempt(&self, error: &ErrorRecord, ctx: &RequestContext) -> bool {
        if error.is_critical() {
            debug!("Skipping recovery for critical error {}", error.id);
            return false;
        }

        let strategies: Vec<_> = self.strategies.read().clone();

        for strategy in strategies {
            let name = strategy.name().to_string();
            let applies = std::panic::catch_unwind(AssertUnwindSafe(|| strategy.applies_to(error)))
                .unwrap_or_else(|payload| {
                    error!(
                        "Recovery strategy '{}' condition panicked: {}",
                        name,
                        panic_message(payload.as_ref())
                    );
                    false
                });
            if !applies {
                continue;
            }

            debug!("Attempting recovery '{}' for error {}", name, error.id);
            let attempt = AssertUnwindSafe(strategy.recover(error, ctx)).catch_unwind();

            match TimeoutWrapper::maybe(self.timeout, attempt).await {
                Ok(Ok(Ok(true))) => {
                    info!("Error {} recovered by strategy '{}'", error.id, name);
                    return true;
                }
                Ok(Ok(Ok(false))) => {
                    debug!("Recovery strategy '{}' did not recover {}", name, error.id);
                }
                Ok(Ok(Err(e))) => {
                    warn!("Recovery strategy '{}' failed: {}", name, e);
                }
                Ok(Err(payload)) => {
                    error!(
                        "Recovery strategy '{}' panicked: {}",
                        name,
                        panic_message(payload.as_ref())
                    );
                }
                Err(e) => {
                    warn!("Recovery strategy '{}' abandoned: {}", name, e);
                }
            }
        }

        false
    }
}

impl std::fmt::Debug for RecoveryChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryChain")
            .field("strategies", &self.names())
            .field("timeout", &self.timeout)
            .finish()
    }
}
