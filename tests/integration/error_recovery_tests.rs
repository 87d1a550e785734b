//! Error classification and recovery integration tests

#[cfg(test)]
mod tests {
    use crate::common::monitoring_at;
    use opsgate::config::Config;
    use opsgate::monitoring::MonitoringEvent;
    use opsgate::monitoring::errors::{
        ErrorCategory, ErrorSeverity, Failure, FnStrategy, RequestContext, RetryStrategy,
    };
    use opsgate::monitoring::sink::{ErrorLogFilter, RecordSink};
    use opsgate::utils::error::{OpsError, RetryConfig, RetryPolicy};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter: false,
            ..Default::default()
        })
    }

    fn ctx() -> RequestContext {
        RequestContext {
            request_id: Some("req-42".to_string()),
            path: Some("/orders".to_string()),
            method: Some("POST".to_string()),
            ..Default::default()
        }
    }

    /// An untyped message about a lost connection is a HIGH database error
    #[tokio::test]
    async fn test_database_failure_recovered_by_reconnect() {
        let (monitoring, _clock) = monitoring_at(&Config::default()).await;
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        monitoring
            .errors()
            .register_recovery_strategy(Arc::new(RetryStrategy::database_reconnect(
                move || {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        if attempt < 2 {
                            Err(OpsError::database("still down"))
                        } else {
                            Ok(())
                        }
                    }
                },
                fast_policy(3),
            )));
        let mut events = monitoring.subscribe();

        let record = monitoring
            .errors()
            .handle(
                Failure::new("database connection lost").with_status_code(500),
                ctx(),
            )
            .await;

        assert_eq!(record.category, ErrorCategory::Database);
        assert_eq!(record.severity, ErrorSeverity::High);
        assert_eq!(record.status_code, 500);
        assert_eq!(record.request_id.as_deref(), Some("req-42"));
        assert!(record.recovered);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        let stats = monitoring.errors().statistics();
        assert_eq!(stats.total_errors, 1);
        assert_eq!(stats.recovered_errors, 1);
        assert_eq!(stats.by_category.get("DATABASE"), Some(&1));

        let stored = monitoring
            .sink()
            .error_logs(&ErrorLogFilter {
                recovered: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, record.id);

        match events.try_recv() {
            Ok(MonitoringEvent::ErrorHandled { id, recovered, .. }) => {
                assert_eq!(id, record.id);
                assert!(recovered);
            }
            other => panic!("expected ErrorHandled event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reconnect_gives_up_after_policy() {
        let (monitoring, _clock) = monitoring_at(&Config::default()).await;
        monitoring
            .errors()
            .register_recovery_strategy(Arc::new(RetryStrategy::database_reconnect(
                || async { Err(OpsError::database("refused")) },
                fast_policy(2),
            )));

        let record = monitoring
            .errors()
            .handle(Failure::new("database connection lost"), ctx())
            .await;
        assert!(!record.recovered);
        assert_eq!(monitoring.errors().statistics().recovered_errors, 0);
    }

    /// Strategies run in order; the first one to recover wins
    #[tokio::test]
    async fn test_strategies_tried_in_registration_order() {
        let (monitoring, _clock) = monitoring_at(&Config::default()).await;
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for (name, result) in [("first", false), ("second", true), ("third", true)] {
            let order = order.clone();
            monitoring
                .errors()
                .register_recovery_strategy(Arc::new(FnStrategy::for_category(
                    name,
                    ErrorCategory::Network,
                    move |_, _| {
                        order.lock().push(name);
                        async move { Ok(result) }
                    },
                )));
        }

        let record = monitoring
            .errors()
            .handle(Failure::new("upstream network unreachable").with_status_code(502), ctx())
            .await;
        assert_eq!(record.category, ErrorCategory::Network);
        assert!(record.recovered);
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_critical_errors_skip_recovery() {
        let (monitoring, _clock) = monitoring_at(&Config::default()).await;
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        monitoring
            .errors()
            .register_recovery_strategy(Arc::new(FnStrategy::new(
                "always",
                |_| true,
                move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async { Ok(true) }
                },
            )));

        let record = monitoring
            .errors()
            .handle(
                Failure::new("out of memory").with_severity(ErrorSeverity::Critical),
                ctx(),
            )
            .await;
        assert!(!record.recovered);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(monitoring.errors().statistics().critical_errors, 1);
    }

    #[tokio::test]
    async fn test_error_rate_window_slides() {
        let (monitoring, clock) = monitoring_at(&Config::default()).await;

        for _ in 0..4 {
            monitoring
                .errors()
                .handle(Failure::new("validation failed: email"), ctx())
                .await;
            clock.advance_secs(20);
        }

        // Errors at t=0,20,40,60 seen from t=80; the window edge is inclusive
        let stats = monitoring.errors().statistics();
        assert_eq!(stats.total_errors, 4);
        assert_eq!(stats.error_rate, 3);
        assert_eq!(stats.window_secs, 60);
    }
}
