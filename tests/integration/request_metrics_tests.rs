//! Request metrics integration tests
//!
//! Requests are driven straight through the aggregator so response times and
//! the requests-per-minute window follow the virtual clock exactly.

#[cfg(test)]
mod tests {
    use crate::common::monitoring_at;
    use opsgate::config::Config;
    use opsgate::monitoring::requests::{LogLevel, RequestMeta};
    use opsgate::monitoring::sink::{RecordSink, RequestLogFilter};

    /// Simulate one request taking `duration_ms` of virtual time
    async fn simulate(
        monitoring: &opsgate::MonitoringSystem,
        clock: &opsgate::utils::MockClock,
        meta: RequestMeta,
        status: u16,
        duration_ms: i64,
    ) {
        let id = monitoring
            .requests()
            .on_request_start(meta)
            .expect("path is tracked");
        clock.advance(chrono::Duration::milliseconds(duration_ms));
        monitoring
            .requests()
            .on_request_finish(&id, status, Some(128))
            .await
            .expect("request was in flight");
    }

    /// 120 requests spread over 90 seconds: only the last minute counts
    #[tokio::test]
    async fn test_requests_per_minute_over_sliding_window() {
        let (monitoring, clock) = monitoring_at(&Config::default()).await;

        for i in 0..120 {
            let status = if i % 10 == 0 { 500 } else { 200 };
            simulate(&monitoring, &clock, RequestMeta::new("GET", "/items"), status, 0).await;
            clock.advance(chrono::Duration::milliseconds(750));
        }

        let metrics = monitoring.requests().metrics();
        assert_eq!(metrics.total_requests, 120);
        assert_eq!(metrics.failed_requests, 12);
        assert_eq!(metrics.successful_requests, 108);
        assert_eq!(metrics.requests_per_minute, 80);
        assert_eq!(metrics.by_status.get("5xx"), Some(&12));
        assert_eq!(metrics.in_flight, 0);

        clock.advance_secs(120);
        assert_eq!(monitoring.requests().metrics().requests_per_minute, 0);
        assert_eq!(monitoring.requests().metrics().total_requests, 120);
    }

    #[tokio::test]
    async fn test_percentiles_and_slow_requests() {
        let (monitoring, clock) = monitoring_at(&Config::default()).await;

        for ms in 1..=100 {
            simulate(
                &monitoring,
                &clock,
                RequestMeta::new("POST", "/checkout"),
                200,
                ms * 20,
            )
            .await;
        }

        let metrics = monitoring.requests().metrics();
        assert_eq!(metrics.total_requests, 100);
        // 20..=2000ms in 20ms steps; 1000ms is the slow threshold
        assert_eq!(metrics.slow_requests, 50);
        assert!((metrics.average_response_time_ms - 1010.0).abs() < f64::EPSILON);
        assert!(metrics.p95_response_time_ms >= 1880.0);
        assert!(metrics.p99_response_time_ms >= metrics.p95_response_time_ms);
        assert_eq!(metrics.by_method.get("POST"), Some(&100));
        assert_eq!(metrics.by_path.get("/checkout"), Some(&100));
    }

    #[tokio::test]
    async fn test_request_logs_reach_sink() {
        let (monitoring, clock) = monitoring_at(&Config::default()).await;

        simulate(
            &monitoring,
            &clock,
            RequestMeta::new("GET", "/users")
                .with_query("page=1&api_key=abc")
                .with_request_id("req-1"),
            200,
            15,
        )
        .await;
        simulate(&monitoring, &clock, RequestMeta::new("GET", "/users/9"), 404, 5).await;
        simulate(&monitoring, &clock, RequestMeta::new("DELETE", "/users/9"), 503, 40).await;

        let failures = monitoring
            .sink()
            .request_logs(&RequestLogFilter {
                min_status: Some(400),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].level, LogLevel::Warn);
        assert_eq!(failures[1].level, LogLevel::Error);
        assert_eq!(failures[1].response_time_ms, Some(40));

        let all = monitoring
            .sink()
            .request_logs(&RequestLogFilter::default())
            .await
            .unwrap();
        assert_eq!(all[0].id, "req-1");
        let query = all[0].query.as_ref().unwrap();
        assert_eq!(query["page"], "1");
        assert_eq!(query["api_key"], opsgate::utils::logging::REDACTED);
    }

    #[tokio::test]
    async fn test_excluded_paths_are_not_tracked() {
        let mut config = Config::default();
        config.requests.exclude_paths = vec!["/internal/*".to_string()];
        config.requests.exclude_patterns = vec![r"^/static/.+\.css$".to_string()];
        let (monitoring, _clock) = monitoring_at(&config).await;

        let requests = monitoring.requests();
        assert!(requests.on_request_start(RequestMeta::new("GET", "/internal/debug")).is_none());
        assert!(requests.on_request_start(RequestMeta::new("GET", "/static/site.css")).is_none());
        assert!(requests.on_request_start(RequestMeta::new("GET", "/static/app.js")).is_some());
        assert_eq!(requests.in_flight_count(), 1);
    }
}
