//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use opsgate::config::{Config, LogFormat, ProbeCheckConfig, SinkKind};
    use opsgate::monitoring::MonitoringSystem;
    use opsgate::monitoring::errors::{ErrorCategory, Failure, RequestContext};
    use opsgate::monitoring::health::{DependencyKind, HealthState};
    use opsgate::monitoring::sink::{ErrorLogFilter, JsonlSink, RecordSink};
    use std::collections::HashMap;

    const EXAMPLE: &str = include_str!("../../config/opsgate.yaml.example");

    #[test]
    fn test_example_config_parses() {
        let config = Config::from_yaml(EXAMPLE).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.health.probes.len(), 3);
        assert_eq!(config.health.probes[0].kind, DependencyKind::Database);
        assert!(config.health.probes[0].critical);
        assert!(matches!(
            config.health.probes[1].check,
            ProbeCheckConfig::Http { timeout_ms: 5_000, .. }
        ));
        assert_eq!(config.sink.kind, SinkKind::Memory);
        assert!(config.expose_stack());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.environment, "development");
        assert_eq!(config.health.cache_ttl_secs, 5);
        assert_eq!(config.requests.exclude_paths, vec!["/health/live", "/favicon.ico"]);
        assert_eq!(config.version(), opsgate::VERSION);
    }

    #[test]
    fn test_invalid_documents_rejected() {
        let cases = [
            "server:\n  port: 0\n",
            "sink:\n  kind: file\n",
            "requests:\n  exclude_patterns: ['([']\n",
            "health:\n  probes:\n    - name: a\n      check: {type: file, path: /x}\n    - name: a\n      check: {type: file, path: /y}\n",
            "health:\n  probes:\n    - name: web\n      check: {type: http, url: 'ftp://example.com'}\n",
            "notifier:\n  webhook_url: 'not a url'\n",
        ];
        for yaml in cases {
            assert!(Config::from_yaml(yaml).is_err(), "accepted: {}", yaml);
        }
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ENVIRONMENT", "production"),
            ("PORT", "9090"),
            ("SINK_KIND", "none"),
            ("LOG_FORMAT", "json"),
            ("PROBE_TIMEOUT_MS", "250"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.sink.kind, SinkKind::None);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.health.probe_timeout_ms, Some(250));
        assert!(config.is_production());
        assert!(!config.expose_stack());

        let mut config = Config::default();
        assert!(
            config
                .apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()))
                .is_err()
        );
    }

    /// Probes and the file sink declared in YAML are wired into the system
    #[tokio::test]
    async fn test_yaml_wires_probes_and_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present");
        std::fs::write(&present, "ok").unwrap();
        let logs = dir.path().join("logs");

        let yaml = format!(
            r#"
health:
  probes:
    - name: config-file
      kind: file
      critical: true
      check: {{type: file, path: "{present}"}}
    - name: spool
      kind: file
      check: {{type: file, path: "{missing}"}}
sink:
  kind: file
  path: "{logs}"
"#,
            present = present.display(),
            missing = dir.path().join("missing").display(),
            logs = logs.display(),
        );
        let config = Config::from_yaml(&yaml).unwrap();
        let monitoring = MonitoringSystem::from_config(&config).await.unwrap();

        assert_eq!(monitoring.health().probe_names(), vec!["config-file", "spool"]);
        let snapshot = monitoring.health().check_health(false).await;
        assert_eq!(snapshot.status, HealthState::Degraded);
        assert_eq!(snapshot.checks[0].status, HealthState::Healthy);
        assert_eq!(snapshot.checks[1].status, HealthState::Unhealthy);

        monitoring
            .errors()
            .handle(Failure::new("sql syntax error"), RequestContext::default())
            .await;

        // A fresh sink over the same directory reads what was written
        let reopened = JsonlSink::open(&logs).await.unwrap();
        let stored = reopened.error_logs(&ErrorLogFilter::default()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].category, ErrorCategory::Database);
    }
}
