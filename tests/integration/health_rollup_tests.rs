//! Health rollup integration tests
//!
//! Drive the `/health` endpoints of a full app against scripted probes on a
//! virtual clock.

#[cfg(test)]
mod tests {
    use crate::common::{monitoring_at, probe};
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use opsgate::config::Config;
    use opsgate::monitoring::health::{DependencyKind, DependencyProbe, HealthState, ProbeReport};
    use opsgate::server::{AppState, HttpServer};
    use serde_json::Value;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn state_with(probes: Vec<DependencyProbe>) -> (AppState, opsgate::utils::MockClock) {
        let config = Config::default();
        let (monitoring, clock) = monitoring_at(&config).await;
        for p in probes {
            monitoring.health().register(p);
        }
        (AppState::new(config, monitoring), clock)
    }

    /// A failing critical database and a slow optional cache
    #[actix_web::test]
    async fn test_critical_failure_makes_system_unhealthy() {
        let (state, _clock) = state_with(vec![
            probe(
                "db",
                DependencyKind::Database,
                true,
                ProbeReport::unhealthy("connection refused"),
            ),
            probe(
                "cache",
                DependencyKind::Service,
                false,
                ProbeReport::degraded("high latency").with_response_time(850),
            ),
        ])
        .await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state.clone()))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "UNHEALTHY");
        assert_eq!(body["environment"], "development");
        assert_eq!(body["checks"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["checks"][0]["critical"], true);
        assert_eq!(body["checks"][0]["kind"], "database");
        assert_eq!(body["checks"][1]["responseTimeMs"], 850);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        // Removing the failing dependency lets the system recover to DEGRADED
        assert!(state.health().unregister("db"));
        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/health?cache=false").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "DEGRADED");
    }

    #[actix_web::test]
    async fn test_non_critical_failure_only_degrades() {
        let (state, _clock) = state_with(vec![
            probe("db", DependencyKind::Database, true, ProbeReport::healthy()),
            probe(
                "mailer",
                DependencyKind::Api,
                false,
                ProbeReport::unhealthy("smtp down"),
            ),
        ])
        .await;

        let snapshot = state.health().check_health(false).await;
        assert_eq!(snapshot.status, HealthState::Degraded);
        assert!(snapshot.failed_critical().is_empty());
        assert!(state.health().readiness().await.ready);
    }

    #[actix_web::test]
    async fn test_snapshot_cached_until_ttl_expires() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let counted = DependencyProbe::from_fn("db", DependencyKind::Database, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(ProbeReport::healthy()) }
        });
        let (state, clock) = state_with(vec![counted]).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state.clone()))).await;

        for _ in 0..3 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance_secs(6);
        test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Bypassing the cache always runs probes
        test::call_service(
            &app,
            test::TestRequest::get().uri("/health?cache=false").to_request(),
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health/stats").to_request()).await;
        let stats: Value = test::read_body_json(resp).await;
        assert_eq!(stats["totalChecks"], 3);
        assert_eq!(stats["healthy"], 3);
        assert_eq!(stats["registeredProbes"], 1);
    }

    #[actix_web::test]
    async fn test_uptime_follows_clock() {
        let (state, clock) = state_with(Vec::new()).await;
        clock.advance_secs(90);

        let liveness = state.health().liveness();
        assert!(liveness.alive);
        assert_eq!(liveness.uptime_seconds, 90);

        let snapshot = state.health().check_health(false).await;
        assert_eq!(snapshot.status, HealthState::Healthy);
        assert_eq!(snapshot.uptime_seconds, 90);
    }
}
