//! Core MonitoringSystem implementation

use crate::config::Config;
use crate::utils::error::Result;
use crate::utils::time::{SharedClock, system_clock};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::errors::ErrorHandler;
use super::events::{EventBus, MonitoringEvent};
use super::health::{DependencyProbe, HealthRegistry};
use super::requests::RequestAggregator;
use super::sink::{RecordSink, build_notifiers, build_sink};

/// Owns one instance of every monitoring component
#[derive(Clone)]
pub struct MonitoringSystem {
    config: Arc<Config>,
    health: Arc<HealthRegistry>,
    errors: Arc<ErrorHandler>,
    requests: Arc<RequestAggregator>,
    sink: Arc<dyn RecordSink>,
    events: EventBus,
    clock: SharedClock,
    /// Handle of the periodic health task while it runs
    health_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl MonitoringSystem {
    /// Build every component from configuration using the wall clock
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::with_clock(config, system_clock()).await
    }

    /// Build every component from configuration on the given clock
    pub async fn with_clock(config: &Config, clock: SharedClock) -> Result<Self> {
        info!("Initializing monitoring system");

        let sink = build_sink(&config.sink).await?;
        let notifiers = build_notifiers(&config.notifier)?;
        let events = EventBus::default();

        let health = HealthRegistry::new(
            &config.health,
            config.version(),
            config.environment.clone(),
            events.clone(),
            clock.clone(),
        );
        let client = reqwest::Client::new();
        for probe in &config.health.probes {
            health.register(DependencyProbe::from_config(probe, &client));
        }

        let errors = ErrorHandler::new(
            &config.errors,
            sink.clone(),
            notifiers,
            events.clone(),
            clock.clone(),
        );
        let requests =
            RequestAggregator::new(&config.requests, sink.clone(), events.clone(), clock.clone())?;

        info!(
            probes = health.probe_count(),
            sink = ?config.sink.kind,
            "Monitoring system initialized"
        );

        Ok(Self {
            config: Arc::new(config.clone()),
            health: Arc::new(health),
            errors: Arc::new(errors),
            requests: Arc::new(requests),
            sink,
            events,
            clock,
            health_task: Arc::new(Mutex::new(None)),
        })
    }

    /// Start periodic health aggregation
    pub fn start(&self) {
        let interval = Duration::from_secs(self.config.health.check_interval_secs);
        if let Some(handle) = self.health.start(interval) {
            *self.health_task.lock() = Some(handle);
        }
    }

    /// Stop periodic health aggregation
    pub fn stop(&self) {
        self.health.stop();
        if let Some(handle) = self.health_task.lock().take() {
            handle.abort();
            debug!("Health check task aborted");
        }
        info!("Monitoring system stopped");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn health(&self) -> &Arc<HealthRegistry> {
        &self.health
    }

    pub fn errors(&self) -> &Arc<ErrorHandler> {
        &self.errors
    }

    pub fn requests(&self) -> &Arc<RequestAggregator> {
        &self.requests
    }

    pub fn sink(&self) -> &Arc<dyn RecordSink> {
        &self.sink
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MonitoringEvent> {
        self.events.subscribe()
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}

impl std::fmt::Debug for MonitoringSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringSystem")
            .field("health", &self.health)
            .field("errors", &self.errors)
            .field("requests", &self.requests)
            .field("sink", &self.sink)
            .finish()
    }
}
