//! Dependency health registry

use super::probe::DependencyProbe;
use super::system_metrics::SystemMetricsSampler;
use super::types::{
    HealthResult, HealthState, HealthStatistics, Liveness, ProbeReport, Readiness,
    SystemHealthSnapshot,
};
use crate::config::HealthConfig;
use crate::monitoring::events::{EventBus, MonitoringEvent};
use crate::monitoring::panic_message;
use crate::utils::error::TimeoutWrapper;
use crate::utils::time::SharedClock;
use crate::utils::ttl_cache::TtlCache;
use crate::utils::window::{BoundedPush, tail};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Roll individual results up into one system status
///
/// A critical UNHEALTHY result fails the system; any other non-healthy
/// result only degrades it.
pub fn rollup(checks: &[HealthResult]) -> HealthState {
    let mut status = HealthState::Healthy;
    for check in checks {
        match check.status {
            HealthState::Unhealthy if check.critical => return HealthState::Unhealthy,
            HealthState::Unhealthy | HealthState::Degraded => status = HealthState::Degraded,
            HealthState::Healthy => {}
        }
    }
    status
}

/// Holds named probes, runs them and caches the rollup
pub struct HealthRegistry {
    /// Probes in registration order
    probes: RwLock<Vec<DependencyProbe>>,
    cache: TtlCache<SystemHealthSnapshot>,
    history: Mutex<VecDeque<HealthResult>>,
    history_size: usize,
    probe_timeout: Option<Duration>,
    sampler: SystemMetricsSampler,
    started_at: DateTime<Utc>,
    version: String,
    environment: String,
    events: EventBus,
    clock: SharedClock,
    /// Whether the background task should keep running
    pub(super) active: AtomicBool,
}

impl HealthRegistry {
    pub fn new(
        config: &HealthConfig,
        version: impl Into<String>,
        environment: impl Into<String>,
        events: EventBus,
        clock: SharedClock,
    ) -> Self {
        Self {
            probes: RwLock::new(Vec::new()),
            cache: TtlCache::new(Duration::from_secs(config.cache_ttl_secs)),
            history: Mutex::new(VecDeque::new()),
            history_size: config.history_size,
            probe_timeout: config.probe_timeout_ms.map(Duration::from_millis),
            sampler: SystemMetricsSampler::new(),
            started_at: clock.now(),
            version: version.into(),
            environment: environment.into(),
            events,
            clock,
            active: AtomicBool::new(false),
        }
    }

    /// Add a probe, replacing any probe with the same name in place
    pub fn register(&self, probe: DependencyProbe) {
        let mut probes = self.probes.write();
        match probes.iter_mut().find(|p| p.name() == probe.name()) {
            Some(existing) => {
                warn!("Health probe '{}' already registered, replacing it", probe.name());
                *existing = probe;
            }
            None => {
                debug!("Registered health probe '{}'", probe.name());
                probes.push(probe);
            }
        }
    }

    /// Remove a probe; returns whether it existed
    pub fn unregister(&self, name: &str) -> bool {
        let mut probes = self.probes.write();
        let before = probes.len();
        probes.retain(|p| p.name() != name);
        let removed = probes.len() != before;
        if removed {
            debug!("Unregistered health probe '{}'", name);
        }
        removed
    }

    pub fn probe_names(&self) -> Vec<String> {
        self.probes.read().iter().map(|p| p.name().to_string()).collect()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.read().len()
    }

    /// Aggregate every probe into a snapshot
    ///
    /// With `use_cache` a snapshot younger than the cache TTL is returned
    /// as is.
    pub async fn check_health(&self, use_cache: bool) -> Arc<SystemHealthSnapshot> {
        if use_cache {
            if let Some(snapshot) = self.cache.get(self.clock.now()) {
                return snapshot;
            }
        }

        let probes: Vec<DependencyProbe> = self.probes.read().clone();
        let checks = join_all(probes.iter().map(|probe| self.run_probe(probe))).await;
        let status = rollup(&checks);

        {
            let mut history = self.history.lock();
            for check in &checks {
                history.push_bounded(check.clone(), self.history_size);
            }
        }

        let now = self.clock.now();
        let snapshot = SystemHealthSnapshot {
            status,
            timestamp: now,
            uptime_seconds: self.uptime_seconds(now),
            checks,
            system_metrics: self.sampler.sample(),
            version: self.version.clone(),
            environment: self.environment.clone(),
        };

        let failed_critical = snapshot.failed_critical();
        if status != HealthState::Healthy {
            warn!(
                status = %status,
                failed_critical = ?failed_critical,
                "System health is {}",
                status
            );
        }
        self.events.publish(MonitoringEvent::HealthChecked {
            status,
            checks: snapshot.checks.len(),
            failed_critical,
            timestamp: now,
        });

        self.cache.set(snapshot, now)
    }

    /// Run a single probe, bypassing the cache and rollup
    pub async fn check_dependency(&self, name: &str) -> Option<HealthResult> {
        let probe = self
            .probes
            .read()
            .iter()
            .find(|p| p.name() == name)
            .cloned()?;

        let result = self.run_probe(&probe).await;
        self.history
            .lock()
            .push_bounded(result.clone(), self.history_size);
        Some(result)
    }

    pub fn liveness(&self) -> Liveness {
        Liveness {
            alive: true,
            uptime_seconds: self.uptime_seconds(self.clock.now()),
        }
    }

    /// Ready unless a critical probe is unhealthy in the cached snapshot
    pub async fn readiness(&self) -> Readiness {
        let snapshot = self.check_health(true).await;
        let failed = snapshot.failed_critical();
        Readiness {
            ready: failed.is_empty(),
            checks: failed,
        }
    }

    pub fn statistics(&self) -> HealthStatistics {
        let history = self.history.lock();
        let total_checks = history.len();
        let mut healthy = 0;
        let mut degraded = 0;
        let mut unhealthy = 0;
        let mut response_times = Vec::new();

        for result in history.iter() {
            match result.status {
                HealthState::Healthy => healthy += 1,
                HealthState::Degraded => degraded += 1,
                HealthState::Unhealthy => unhealthy += 1,
            }
            if let Some(ms) = result.response_time_ms {
                response_times.push(ms);
            }
        }

        let average_response_time_ms = if response_times.is_empty() {
            0.0
        } else {
            response_times.iter().sum::<u64>() as f64 / response_times.len() as f64
        };
        let uptime_percentage = if total_checks == 0 {
            100.0
        } else {
            healthy as f64 / total_checks as f64 * 100.0
        };

        HealthStatistics {
            total_checks,
            healthy,
            degraded,
            unhealthy,
            average_response_time_ms,
            uptime_percentage,
            registered_probes: self.probe_count(),
            last_check: history.back().map(|r| r.timestamp),
        }
    }

    /// Most recent probe results, oldest first
    pub fn history(&self, limit: usize) -> Vec<HealthResult> {
        tail(&self.history.lock(), limit)
    }

    /// Snapshot currently held by the cache, regardless of age
    pub fn last_snapshot(&self) -> Option<Arc<SystemHealthSnapshot>> {
        self.cache.peek()
    }

    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    /// Invoke one probe; every failure becomes an UNHEALTHY result
    async fn run_probe(&self, probe: &DependencyProbe) -> HealthResult {
        let timestamp = self.clock.now();
        let start = Instant::now();

        let invocation = AssertUnwindSafe(probe.check().check()).catch_unwind();
        let report = match TimeoutWrapper::maybe(self.probe_timeout, invocation).await {
            Ok(Ok(Ok(report))) => report,
            Ok(Ok(Err(e))) => ProbeReport::unhealthy(e.to_string()),
            Ok(Err(payload)) => {
                let message = panic_message(payload.as_ref());
                warn!("Health probe '{}' panicked: {}", probe.name(), message);
                ProbeReport::unhealthy(format!("probe panicked: {}", message))
            }
            Err(e) => ProbeReport::unhealthy(e.to_string()),
        };
        let measured = start.elapsed().as_millis() as u64;

        if report.status != HealthState::Healthy {
            debug!(
                probe = probe.name(),
                status = %report.status,
                "Health probe reported {}: {}",
                report.status,
                report.message.as_deref().unwrap_or("")
            );
        }

        HealthResult {
            name: probe.name().to_string(),
            kind: probe.kind(),
            critical: probe.is_critical(),
            status: report.status,
            message: report.message,
            response_time_ms: Some(report.response_time_ms.unwrap_or(measured)),
            details: report.details,
            timestamp,
        }
    }

    fn uptime_seconds(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }
}

impl std::fmt::Debug for HealthRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthRegistry")
            .field("probes", &self.probe_names())
            .field("history_size", &self.history_size)
            .field("probe_timeout", &self.probe_timeout)
            .field("active", &self.active.load(Ordering::Acquire))
            .finish()
    }
}
