//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::monitoring::MonitoringSystem;
use crate::monitoring::errors::ErrorHandler;
use crate::monitoring::health::HealthRegistry;
use crate::monitoring::requests::RequestAggregator;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloning is cheap: every component is behind an `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Health registry, error handler and request aggregator
    pub monitoring: MonitoringSystem,
}

impl AppState {
    pub fn new(config: Config, monitoring: MonitoringSystem) -> Self {
        Self {
            config: Arc::new(config),
            monitoring,
        }
    }

    /// Build the monitoring system from `config` and wrap both
    pub async fn from_config(config: Config) -> crate::utils::error::Result<Self> {
        let monitoring = MonitoringSystem::from_config(&config).await?;
        Ok(Self::new(config, monitoring))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn health(&self) -> &Arc<HealthRegistry> {
        self.monitoring.health()
    }

    pub fn errors(&self) -> &Arc<ErrorHandler> {
        self.monitoring.errors()
    }

    pub fn requests(&self) -> &Arc<RequestAggregator> {
        self.monitoring.requests()
    }
}
