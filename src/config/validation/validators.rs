//! Configuration validators
//!
//! Validation implementations for each configuration section.

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Worker count must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for HealthConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating health configuration");

        if self.history_size == 0 {
            return Err("Health history size must be greater than 0".to_string());
        }

        if self.probe_timeout_ms == Some(0) {
            return Err("Probe timeout must be greater than 0 when set".to_string());
        }

        let mut names = HashSet::new();
        for probe in &self.probes {
            probe.validate()?;
            if !names.insert(probe.name.as_str()) {
                return Err(format!("Duplicate probe name '{}'", probe.name));
            }
        }

        Ok(())
    }
}

impl Validate for ProbeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Probe name cannot be empty".to_string());
        }

        match &self.check {
            ProbeCheckConfig::Http { url, timeout_ms } => {
                let parsed = url::Url::parse(url)
                    .map_err(|e| format!("Probe '{}' has an invalid URL: {}", self.name, e))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(format!(
                        "Probe '{}' URL must use http or https",
                        self.name
                    ));
                }
                if *timeout_ms == 0 {
                    return Err(format!("Probe '{}' timeout cannot be 0", self.name));
                }
            }
            ProbeCheckConfig::Tcp {
                address,
                timeout_ms,
            } => {
                if !address.contains(':') {
                    return Err(format!(
                        "Probe '{}' address must be in host:port form",
                        self.name
                    ));
                }
                if *timeout_ms == 0 {
                    return Err(format!("Probe '{}' timeout cannot be 0", self.name));
                }
            }
            ProbeCheckConfig::File { path } => {
                if path.is_empty() {
                    return Err(format!("Probe '{}' path cannot be empty", self.name));
                }
            }
        }

        Ok(())
    }
}

impl Validate for ErrorsConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating error handler configuration");

        if self.history_size == 0 {
            return Err("Error history size must be greater than 0".to_string());
        }

        if self.window_secs == 0 {
            return Err("Error rate window must be greater than 0".to_string());
        }

        if self.strategy_timeout_ms == Some(0) {
            return Err("Strategy timeout must be greater than 0 when set".to_string());
        }

        Ok(())
    }
}

impl Validate for RequestsConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating request metrics configuration");

        if self.history_size == 0 {
            return Err("Request history size must be greater than 0".to_string());
        }

        if self.window_secs == 0 {
            return Err("Request window must be greater than 0".to_string());
        }

        if self.response_time_samples == 0 {
            return Err("Response time samples must be greater than 0".to_string());
        }

        for path in &self.exclude_paths {
            if !path.starts_with('/') {
                return Err(format!("Excluded path '{}' must start with '/'", path));
            }
        }

        for pattern in &self.exclude_patterns {
            regex::Regex::new(pattern)
                .map_err(|e| format!("Invalid exclude pattern '{}': {}", pattern, e))?;
        }

        Ok(())
    }
}

impl Validate for SinkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.kind == SinkKind::File && self.path.as_deref().is_none_or(str::is_empty) {
            return Err("File sink requires a path".to_string());
        }

        if self.kind == SinkKind::Memory && self.max_records == 0 {
            return Err("Memory sink max records must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for NotifierConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(webhook_url) = &self.webhook_url {
            url::Url::parse(webhook_url).map_err(|e| format!("Invalid webhook URL: {}", e))?;
        }

        if self.timeout_secs == 0 {
            return Err("Notifier timeout cannot be 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map_err(|e| format!("Invalid log filter '{}': {}", self.level, e))?;

        Ok(())
    }
}
