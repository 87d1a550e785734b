//! Test fixtures and factories

use chrono::{DateTime, TimeZone, Utc};
use opsgate::config::Config;
use opsgate::monitoring::MonitoringSystem;
use opsgate::monitoring::health::{DependencyKind, DependencyProbe, ProbeReport};
use opsgate::utils::MockClock;
use std::sync::Arc;

/// Fixed instant every virtual clock starts from
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Monitoring system driven by a mock clock
pub async fn monitoring_at(config: &Config) -> (MonitoringSystem, MockClock) {
    let clock = MockClock::new(start_time());
    let monitoring = MonitoringSystem::with_clock(config, Arc::new(clock.clone()))
        .await
        .expect("monitoring system builds from config");
    (monitoring, clock)
}

/// Probe that always answers with `report`
pub fn probe(name: &str, kind: DependencyKind, critical: bool, report: ProbeReport) -> DependencyProbe {
    DependencyProbe::from_fn(name, kind, move || {
        let report = report.clone();
        async move { Ok(report) }
    })
    .critical(critical)
}
