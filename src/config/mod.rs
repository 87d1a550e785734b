//! Configuration management for opsgate
//!
//! Configuration is read from a YAML file, then overridden by `OPSGATE_*`
//! environment variables, then validated.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{OpsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix of environment variables that override file configuration
pub const ENV_PREFIX: &str = "OPSGATE_";

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Deployment environment; `production` hides stacks from clients
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Version reported in health snapshots (crate version when unset)
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub errors: ErrorsConfig,
    #[serde(default)]
    pub requests: RequestsConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            version: None,
            server: ServerConfig::default(),
            health: HealthConfig::default(),
            errors: ErrorsConfig::default(),
            requests: RequestsConfig::default(),
            sink: SinkConfig::default(),
            notifier: NotifierConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| OpsError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| OpsError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `OPSGATE_*` variables from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Apply overrides from a key lookup (keys are given without the prefix)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("ENVIRONMENT") {
            self.environment = value;
        }
        if let Some(value) = lookup("VERSION") {
            self.version = Some(value);
        }
        if let Some(value) = lookup("HOST") {
            self.server.host = value;
        }
        if let Some(value) = lookup("PORT") {
            self.server.port = parse_override("PORT", &value)?;
        }
        if let Some(value) = lookup("WORKERS") {
            self.server.workers = Some(parse_override("WORKERS", &value)?);
        }
        if let Some(value) = lookup("HEALTH_CACHE_TTL_SECS") {
            self.health.cache_ttl_secs = parse_override("HEALTH_CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("HEALTH_CHECK_INTERVAL_SECS") {
            self.health.check_interval_secs =
                parse_override("HEALTH_CHECK_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = lookup("PROBE_TIMEOUT_MS") {
            self.health.probe_timeout_ms = Some(parse_override("PROBE_TIMEOUT_MS", &value)?);
        }
        if let Some(value) = lookup("STRATEGY_TIMEOUT_MS") {
            self.errors.strategy_timeout_ms =
                Some(parse_override("STRATEGY_TIMEOUT_MS", &value)?);
        }
        if let Some(value) = lookup("SLOW_THRESHOLD_MS") {
            self.requests.slow_threshold_ms = parse_override("SLOW_THRESHOLD_MS", &value)?;
        }
        if let Some(value) = lookup("SINK_KIND") {
            self.sink.kind = match value.to_lowercase().as_str() {
                "memory" => SinkKind::Memory,
                "file" => SinkKind::File,
                "none" => SinkKind::None,
                other => {
                    return Err(OpsError::Config(format!(
                        "Invalid {}SINK_KIND '{}'",
                        ENV_PREFIX, other
                    )));
                }
            };
        }
        if let Some(value) = lookup("SINK_PATH") {
            self.sink.path = Some(value);
        }
        if let Some(value) = lookup("WEBHOOK_URL") {
            self.notifier.webhook_url = Some(value);
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = lookup("LOG_FORMAT") {
            self.logging.format = match value.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(OpsError::Config(format!(
                        "Invalid {}LOG_FORMAT '{}'",
                        ENV_PREFIX, other
                    )));
                }
            };
        }
        Ok(())
    }

    /// Whether this process runs in production
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Whether client error envelopes carry the failure stack
    pub fn expose_stack(&self) -> bool {
        self.errors.expose_stack.unwrap_or(!self.is_production())
    }

    /// Version reported by health snapshots
    pub fn version(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| crate::VERSION.to_string())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if self.environment.trim().is_empty() {
            return Err(OpsError::Config("Environment cannot be empty".to_string()));
        }

        self.server
            .validate()
            .map_err(|e| OpsError::Config(format!("Server config error: {}", e)))?;
        self.health
            .validate()
            .map_err(|e| OpsError::Config(format!("Health config error: {}", e)))?;
        self.errors
            .validate()
            .map_err(|e| OpsError::Config(format!("Errors config error: {}", e)))?;
        self.requests
            .validate()
            .map_err(|e| OpsError::Config(format!("Requests config error: {}", e)))?;
        self.sink
            .validate()
            .map_err(|e| OpsError::Config(format!("Sink config error: {}", e)))?;
        self.notifier
            .validate()
            .map_err(|e| OpsError::Config(format!("Notifier config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| OpsError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.environment != default_environment() {
            self.environment = other.environment;
        }
        if other.version.is_some() {
            self.version = other.version;
        }
        self.server = self.server.merge(other.server);
        self.health = self.health.merge(other.health);
        self.errors = self.errors.merge(other.errors);
        self.requests = self.requests.merge(other.requests);
        self.sink = self.sink.merge(other.sink);
        self.notifier = self.notifier.merge(other.notifier);
        self.logging = self.logging.merge(other.logging);
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| OpsError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_override<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        OpsError::Config(format!("Invalid {}{} '{}': {}", ENV_PREFIX, key, value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::health::DependencyKind;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
environment: staging
server:
  host: "127.0.0.1"
  port: 9090

health:
  cache_ttl_secs: 10
  probes:
    - name: upstream
      kind: api
      critical: true
      check:
        type: http
        url: "http://localhost:9000/health"
    - name: spool
      kind: file
      check:
        type: file
        path: /var/spool/opsgate

requests:
  slow_threshold_ms: 250
  exclude_paths: ["/health/live", "/internal/*"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.environment, "staging");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.health.cache_ttl_secs, 10);
        assert_eq!(config.health.history_size, 100);
        assert_eq!(config.health.probes.len(), 2);
        assert_eq!(config.health.probes[0].kind, DependencyKind::Api);
        assert!(config.health.probes[0].critical);
        assert!(!config.health.probes[1].critical);
        assert!(matches!(
            config.health.probes[0].check,
            ProbeCheckConfig::Http { timeout_ms: 5_000, .. }
        ));
        assert_eq!(config.requests.slow_threshold_ms, 250);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.health.cache_ttl_secs, 5);
        assert_eq!(config.health.check_interval_secs, 30);
        assert!(config.health.probe_timeout_ms.is_none());
        assert!(config.errors.strategy_timeout_ms.is_none());
        assert_eq!(config.requests.slow_threshold_ms, 1_000);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let result = Config::from_yaml("server: [not, a, map]");
        assert!(matches!(result, Err(OpsError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9999"),
            ("ENVIRONMENT", "production"),
            ("LOG_FORMAT", "json"),
            ("PROBE_TIMEOUT_MS", "750"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9999);
        assert!(config.is_production());
        assert!(!config.expose_stack());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.health.probe_timeout_ms, Some(750));
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(OpsError::Config(_))));
    }

    #[test]
    fn test_merge_prefers_non_default_values() {
        let base = Config::default();
        let mut other = Config::default();
        other.server.port = 7000;
        other.errors.expose_stack = Some(false);

        let merged = base.merge(other);
        assert_eq!(merged.server.port, 7000);
        assert!(!merged.expose_stack());
        assert_eq!(merged.environment, "development");
    }
}
