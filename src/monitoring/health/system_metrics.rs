//! Host resource sampling using the sysinfo crate
//!
//! Real values are only collected when the `metrics` feature is enabled

use super::types::SystemMetrics;

#[cfg(feature = "metrics")]
use sysinfo::System;

/// Samples memory, CPU and load average
#[derive(Debug)]
pub struct SystemMetricsSampler {
    #[cfg(feature = "metrics")]
    system: parking_lot::Mutex<System>,
}

impl SystemMetricsSampler {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "metrics")]
            system: parking_lot::Mutex::new(System::new()),
        }
    }

    #[cfg(feature = "metrics")]
    pub fn sample(&self) -> SystemMetrics {
        let mut sys = self.system.lock();
        sys.refresh_memory();
        sys.refresh_cpu_usage();

        let memory_total_bytes = sys.total_memory();
        let memory_used_bytes = sys.used_memory();
        let memory_usage_percent = if memory_total_bytes > 0 {
            memory_used_bytes as f64 / memory_total_bytes as f64 * 100.0
        } else {
            0.0
        };
        let load = System::load_average();

        SystemMetrics {
            memory_used_bytes,
            memory_total_bytes,
            memory_usage_percent,
            cpu_usage_percent: sys.global_cpu_usage() as f64,
            load_average: [load.one, load.five, load.fifteen],
        }
    }

    #[cfg(not(feature = "metrics"))]
    pub fn sample(&self) -> SystemMetrics {
        SystemMetrics::default()
    }
}

impl Default for SystemMetricsSampler {
    fn default() -> Self {
        Self::new()
    }
}
