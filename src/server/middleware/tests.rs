//! Middleware tests

use super::helpers::{
    X_REQUEST_ID, failure_from_error, failure_from_panic, header_str, is_textual,
    request_context, request_meta,
};
use crate::monitoring::errors::{ErrorCategory, ErrorSeverity};
use crate::utils::error::OpsError;
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::test::TestRequest;

#[test]
fn test_is_textual() {
    assert!(is_textual("application/json"));
    assert!(is_textual("application/json; charset=utf-8"));
    assert!(is_textual("text/plain"));
    assert!(is_textual("application/x-www-form-urlencoded"));
    assert!(is_textual("Application/XML"));
    assert!(!is_textual("application/octet-stream"));
    assert!(!is_textual("image/png"));
}

#[test]
fn test_header_str_ignores_empty_values() {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(X_REQUEST_ID),
        HeaderValue::from_static(""),
    );
    assert_eq!(header_str(&headers, X_REQUEST_ID), None);

    headers.insert(
        HeaderName::from_static(X_REQUEST_ID),
        HeaderValue::from_static("req-1"),
    );
    assert_eq!(header_str(&headers, X_REQUEST_ID).as_deref(), Some("req-1"));
}

#[test]
fn test_request_context() {
    let req = TestRequest::post()
        .uri("/orders?id=7")
        .insert_header(("x-request-id", "req-9"))
        .insert_header(("x-user-id", "user-1"))
        .insert_header(("x-session-id", "sess-1"))
        .insert_header(("user-agent", "curl/8.0"))
        .insert_header(("x-forwarded-for", "10.0.0.5"))
        .to_http_request();

    let ctx = request_context(&req);
    assert_eq!(ctx.request_id.as_deref(), Some("req-9"));
    assert_eq!(ctx.user_id.as_deref(), Some("user-1"));
    assert_eq!(ctx.session_id.as_deref(), Some("sess-1"));
    assert_eq!(ctx.path.as_deref(), Some("/orders"));
    assert_eq!(ctx.method.as_deref(), Some("POST"));
    assert_eq!(ctx.ip.as_deref(), Some("10.0.0.5"));
    assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.0"));
}

#[test]
fn test_request_meta() {
    let req = TestRequest::get()
        .uri("/search?q=rust")
        .insert_header(("authorization", "Bearer abc"))
        .to_http_request();

    let meta = request_meta(&req);
    assert_eq!(meta.method, "GET");
    assert_eq!(meta.path, "/search");
    assert_eq!(meta.query.as_deref(), Some("q=rust"));
    assert!(
        meta.headers
            .iter()
            .any(|(k, v)| k == "authorization" && v == "Bearer abc")
    );
    assert!(meta.body.is_none());
    assert!(meta.request_id.is_none());

    let req = TestRequest::get().uri("/plain").to_http_request();
    assert!(request_meta(&req).query.is_none());
}

#[test]
fn test_failure_from_ops_error_keeps_taxonomy() {
    let err: actix_web::Error = OpsError::database("pool exhausted").into();
    let failure = failure_from_error(&err);
    assert_eq!(failure.code.as_deref(), Some("DATABASE_ERROR"));
    assert_eq!(failure.status_code, Some(503));
    assert_eq!(failure.category, Some(ErrorCategory::Database));
}

#[test]
fn test_failure_from_untyped_error() {
    let err = actix_web::error::ErrorBadGateway("upstream refused");
    let failure = failure_from_error(&err);
    assert_eq!(failure.message, "upstream refused");
    assert_eq!(failure.status_code, Some(502));
    assert!(failure.code.is_none());
    assert!(failure.category.is_none());
}

#[test]
fn test_failure_from_panic() {
    let failure = failure_from_panic("index out of bounds");
    assert!(failure.message.contains("index out of bounds"));
    assert_eq!(failure.code.as_deref(), Some("PANIC"));
    assert_eq!(failure.status_code, Some(500));
    assert_eq!(failure.severity, Some(ErrorSeverity::Critical));
    assert_eq!(failure.category, Some(ErrorCategory::System));
}
