//! Health registry configuration

use super::*;
use crate::monitoring::health::DependencyKind;
use serde::{Deserialize, Serialize};

/// Health registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// How long an aggregated snapshot is served from cache (0 disables)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Number of probe results retained in history
    #[serde(default = "default_health_history_size")]
    pub history_size: usize,
    /// Interval of the background aggregation task (0 disables it)
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// Optional deadline for a single probe invocation
    #[serde(default)]
    pub probe_timeout_ms: Option<u64>,
    /// Probes built from configuration
    #[serde(default)]
    pub probes: Vec<ProbeConfig>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            history_size: default_health_history_size(),
            check_interval_secs: default_check_interval_secs(),
            probe_timeout_ms: None,
            probes: Vec::new(),
        }
    }
}

impl HealthConfig {
    /// Merge health configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.cache_ttl_secs != default_cache_ttl_secs() {
            self.cache_ttl_secs = other.cache_ttl_secs;
        }
        if other.history_size != default_health_history_size() {
            self.history_size = other.history_size;
        }
        if other.check_interval_secs != default_check_interval_secs() {
            self.check_interval_secs = other.check_interval_secs;
        }
        if other.probe_timeout_ms.is_some() {
            self.probe_timeout_ms = other.probe_timeout_ms;
        }

        // Probes with the same name are replaced, new ones appended
        for probe in other.probes {
            match self.probes.iter_mut().find(|p| p.name == probe.name) {
                Some(existing) => *existing = probe,
                None => self.probes.push(probe),
            }
        }
        self
    }
}

/// A dependency probe declared in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Unique probe name
    pub name: String,
    /// Kind of dependency being checked
    #[serde(default)]
    pub kind: DependencyKind,
    /// Whether an unhealthy result makes the whole system unhealthy
    #[serde(default)]
    pub critical: bool,
    /// What to check
    pub check: ProbeCheckConfig,
}

/// Built-in probe checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProbeCheckConfig {
    /// GET a URL; 2xx is healthy, any other status degraded
    Http {
        url: String,
        #[serde(default = "default_probe_check_timeout_ms")]
        timeout_ms: u64,
    },
    /// Open a TCP connection
    Tcp {
        address: String,
        #[serde(default = "default_probe_check_timeout_ms")]
        timeout_ms: u64,
    },
    /// Require a filesystem path to exist
    File { path: String },
}
