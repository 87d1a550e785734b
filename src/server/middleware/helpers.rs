//! Helper functions for middleware

use crate::monitoring::errors::{ErrorCategory, ErrorSeverity, Failure, RequestContext};
use crate::monitoring::requests::RequestMeta;
use crate::utils::error::OpsError;
use actix_web::HttpRequest;
use actix_web::http::header::{HeaderMap, USER_AGENT};

/// Correlation id header, read from clients and echoed on responses
pub const X_REQUEST_ID: &str = "x-request-id";
/// Authenticated user id forwarded by an upstream auth layer
pub const X_USER_ID: &str = "x-user-id";
/// Session id forwarded by an upstream auth layer
pub const X_SESSION_ID: &str = "x-session-id";

/// Id under which the request aggregator tracks the current request
#[derive(Debug, Clone)]
pub struct TrackedRequest(pub String);

/// Header value as an owned string, if present and valid UTF-8
pub fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Best-effort client address, honoring forwarding headers
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
}

/// Request fields carried into error records
pub fn request_context(req: &HttpRequest) -> RequestContext {
    let headers = req.headers();
    RequestContext {
        request_id: header_str(headers, X_REQUEST_ID),
        user_id: header_str(headers, X_USER_ID),
        session_id: header_str(headers, X_SESSION_ID),
        path: Some(req.path().to_string()),
        method: Some(req.method().to_string()),
        ip: client_ip(req),
        user_agent: header_str(headers, USER_AGENT.as_str()),
    }
}

/// Describe a request for the metrics aggregator, without its body
pub fn request_meta(req: &HttpRequest) -> RequestMeta {
    let headers = req.headers();
    RequestMeta {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: Some(req.query_string().to_string()).filter(|q| !q.is_empty()),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: None,
        ip: client_ip(req),
        user_agent: header_str(headers, USER_AGENT.as_str()),
        user_id: header_str(headers, X_USER_ID),
        session_id: header_str(headers, X_SESSION_ID),
        request_id: header_str(headers, X_REQUEST_ID),
    }
}

/// Whether a body of this content type is worth keeping in request logs
pub fn is_textual(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.starts_with("text/")
        || content_type.contains("json")
        || content_type.contains("x-www-form-urlencoded")
        || content_type.contains("xml")
}

/// Turn an actix error into a failure, keeping the taxonomy of `OpsError`s
pub fn failure_from_error(err: &actix_web::Error) -> Failure {
    match err.as_error::<OpsError>() {
        Some(ops) => Failure::from(ops),
        None => Failure::new(err.to_string())
            .with_status_code(err.as_response_error().status_code().as_u16()),
    }
}

/// Failure describing a handler that panicked
pub fn failure_from_panic(message: &str) -> Failure {
    Failure::new(format!("Handler panicked: {}", message))
        .with_code("PANIC")
        .with_status_code(500)
        .with_severity(ErrorSeverity::Critical)
        .with_category(ErrorCategory::System)
}
