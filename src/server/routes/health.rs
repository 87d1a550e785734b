//! Health check and status endpoints

use crate::server::state::AppState;
use crate::utils::error::OpsError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use std::borrow::Cow;
use tracing::debug;

/// Results returned by `/health/history` when no limit is given
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/status", web::get().to(health_status))
            .route("/live", web::get().to(liveness))
            .route("/ready", web::get().to(readiness))
            .route("/stats", web::get().to(statistics))
            .route("/history", web::get().to(history))
            .route("/dependency/{name}", web::get().to(dependency))
            .route("/metrics", web::get().to(request_metrics))
            .route("/errors", web::get().to(error_statistics))
            .route("/version", web::get().to(version_info)),
    );
}

#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    /// `false` bypasses the snapshot cache
    #[serde(default = "default_cache")]
    pub cache: bool,
}

fn default_cache() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Full system health snapshot
///
/// Answers 503 when a critical dependency is unhealthy.
pub async fn health_check(
    state: web::Data<AppState>,
    query: web::Query<HealthQuery>,
) -> ActixResult<HttpResponse> {
    debug!("Health check requested (cache: {})", query.cache);

    let snapshot = state.health().check_health(query.cache).await;
    Ok(HttpResponse::build(status(snapshot.status.http_status())).json(snapshot.as_ref()))
}

/// Plain-text status for load balancers
pub async fn health_status(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let snapshot = state.health().check_health(true).await;
    Ok(HttpResponse::build(status(snapshot.status.http_status()))
        .content_type("text/plain; charset=utf-8")
        .body(snapshot.status.status_text()))
}

pub async fn liveness(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.health().liveness()))
}

pub async fn readiness(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let readiness = state.health().readiness().await;
    let code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok(HttpResponse::build(code).json(readiness))
}

pub async fn statistics(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.health().statistics()))
}

pub async fn history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> ActixResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(HttpResponse::Ok().json(state.health().history(limit)))
}

/// Run one probe on demand
pub async fn dependency(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let name = path.into_inner();
    debug!("Dependency check requested: {}", name);

    let result = state
        .health()
        .check_dependency(&name)
        .await
        .ok_or_else(|| OpsError::not_found(format!("Dependency '{}' is not registered", name)))?;

    Ok(HttpResponse::build(status(result.status.http_status())).json(result))
}

pub async fn request_metrics(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.requests().metrics()))
}

pub async fn error_statistics(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.errors().statistics()))
}

/// Version and build information
pub async fn version_info(state: web::Data<AppState>) -> HttpResponse {
    let version_info = VersionInfo {
        name: Cow::Borrowed(crate::NAME),
        version: Cow::Owned(state.config().version()),
        environment: Cow::Owned(state.config().environment.clone()),
        build: crate::BuildInfo::current(),
    };
    HttpResponse::Ok().json(version_info)
}

/// Version information
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionInfo {
    name: Cow<'static, str>,
    version: Cow<'static, str>,
    environment: Cow<'static, str>,
    build: crate::BuildInfo,
}
