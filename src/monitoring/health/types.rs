//! Health checking types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Health of one dependency or of the whole system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "HEALTHY",
            Self::Degraded => "DEGRADED",
            Self::Unhealthy => "UNHEALTHY",
        }
    }

    /// Plain-text status line
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Healthy => "OK",
            Self::Degraded => "DEGRADED",
            Self::Unhealthy => "UNHEALTHY",
        }
    }

    /// Only an unhealthy system fails its HTTP health endpoints
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Healthy | Self::Degraded => 200,
            Self::Unhealthy => 503,
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of dependency behind a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Database,
    #[default]
    Service,
    Api,
    File,
    Network,
}

/// What a probe reports about its dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub status: HealthState,
    pub message: Option<String>,
    /// Overrides the measured invocation time when set
    pub response_time_ms: Option<u64>,
    pub details: Option<HashMap<String, Value>>,
}

impl ProbeReport {
    pub fn new(status: HealthState) -> Self {
        Self {
            status,
            message: None,
            response_time_ms: None,
            details: None,
        }
    }

    pub fn healthy() -> Self {
        Self::new(HealthState::Healthy)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::new(HealthState::Degraded).with_message(message)
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::new(HealthState::Unhealthy).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_response_time(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = Some(response_time_ms);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }
}

/// Outcome of one probe invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    pub name: String,
    pub kind: DependencyKind,
    pub critical: bool,
    pub status: HealthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
    pub timestamp: DateTime<Utc>,
}

/// Host resource usage sampled with each snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
    pub memory_usage_percent: f64,
    pub cpu_usage_percent: f64,
    /// 1, 5 and 15 minute load averages
    pub load_average: [f64; 3],
}

/// Aggregated health of every registered probe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealthSnapshot {
    pub status: HealthState,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    /// Results in probe registration order
    pub checks: Vec<HealthResult>,
    pub system_metrics: SystemMetrics,
    pub version: String,
    pub environment: String,
}

impl SystemHealthSnapshot {
    /// Names of critical probes that are currently unhealthy
    pub fn failed_critical(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|c| c.critical && c.status == HealthState::Unhealthy)
            .map(|c| c.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liveness {
    pub alive: bool,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub ready: bool,
    /// Critical probes that are unhealthy
    pub checks: Vec<String>,
}

/// Counters over the health history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatistics {
    pub total_checks: usize,
    pub healthy: usize,
    pub degraded: usize,
    pub unhealthy: usize,
    pub average_response_time_ms: f64,
    pub uptime_percentage: f64,
    pub registered_probes: usize,
    pub last_check: Option<DateTime<Utc>>,
}
