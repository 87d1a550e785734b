//! Dependency health checking
//!
//! Probes are registered by name, executed concurrently, and rolled up into a
//! cached [`SystemHealthSnapshot`].

mod probe;
mod registry;
mod system_metrics;
mod tasks;
mod types;


pub use probe::{DependencyProbe, FileCheck, FnCheck, HealthCheck, HttpCheck, TcpCheck};
pub use registry::{HealthRegistry, rollup};
pub use system_metrics::SystemMetricsSampler;
pub use types::{
    DependencyKind, HealthResult, HealthState, HealthStatistics, Liveness, ProbeReport,
    Readiness, SystemHealthSnapshot, SystemMetrics,
};
