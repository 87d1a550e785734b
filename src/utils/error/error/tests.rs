//! Tests for error handling

#[cfg(test)]
mod tests {
    use super::super::response::ErrorResponse;
    use super::super::types::OpsError;
    use crate::monitoring::errors::{ErrorCategory, ErrorSeverity, Failure};
    use actix_web::ResponseError;

    // ==================== Helper Function Tests ====================

    #[test]
    fn test_error_creation() {
        let error = OpsError::auth("Invalid token");
        assert!(matches!(error, OpsError::Auth(msg) if msg == "Invalid token"));

        let error = OpsError::bad_request("Missing parameter");
        assert!(matches!(error, OpsError::BadRequest(_)));
    }

    #[test]
    fn test_rate_limit_helper() {
        let error = OpsError::rate_limit("slow down", Some(30));
        assert_eq!(error.retry_after_secs(), Some(30));

        let error = OpsError::rate_limit("slow down", None);
        assert_eq!(error.retry_after_secs(), Some(60));

        assert_eq!(OpsError::internal("boom").retry_after_secs(), None);
    }

    // ==================== Taxonomy Tests ====================

    #[test]
    fn test_status_codes() {
        assert_eq!(OpsError::validation("x").status_code(), 400);
        assert_eq!(OpsError::auth("x").status_code(), 401);
        assert_eq!(OpsError::authorization("x").status_code(), 403);
        assert_eq!(OpsError::not_found("x").status_code(), 404);
        assert_eq!(OpsError::rate_limit("x", None).status_code(), 429);
        assert_eq!(OpsError::network("x").status_code(), 502);
        assert_eq!(OpsError::database("x").status_code(), 503);
        assert_eq!(OpsError::internal("x").status_code(), 500);
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(OpsError::fatal("x").severity(), ErrorSeverity::Critical);
        assert_eq!(OpsError::validation("x").severity(), ErrorSeverity::Low);
        assert_eq!(OpsError::auth("x").severity(), ErrorSeverity::Medium);
        assert_eq!(OpsError::database("x").severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            OpsError::validation("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            OpsError::auth("x").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            OpsError::authorization("x").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(OpsError::database("x").category(), ErrorCategory::Database);
        assert_eq!(OpsError::timeout("x").category(), ErrorCategory::Network);
        assert_eq!(
            OpsError::business_rule("x").category(),
            ErrorCategory::BusinessLogic
        );
        assert_eq!(OpsError::internal("x").category(), ErrorCategory::System);
    }

    // ==================== Conversion Tests ====================

    #[test]
    fn test_failure_from_typed_error_keeps_taxonomy() {
        let failure = Failure::from(OpsError::rate_limit("too many", Some(5)));

        assert_eq!(failure.status_code, Some(429));
        assert_eq!(failure.severity, Some(ErrorSeverity::Medium));
        assert_eq!(failure.category, Some(ErrorCategory::BusinessLogic));
        assert_eq!(failure.code.as_deref(), Some("RATE_LIMIT_EXCEEDED"));
        assert_eq!(failure.retry_after_secs, Some(5));
    }

    #[test]
    fn test_failure_from_io_error_records_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let failure = Failure::from(OpsError::from(io));

        assert_eq!(failure.status_code, Some(500));
        assert!(failure.message.contains("missing file"));
    }

    // ==================== Response Tests ====================

    #[test]
    fn test_error_response_status() {
        let response = OpsError::not_found("nothing here").error_response();
        assert_eq!(response.status().as_u16(), 404);
    }

    #[test]
    fn test_rate_limit_response_sets_retry_after() {
        let response = OpsError::rate_limit("slow down", Some(12)).error_response();
        assert_eq!(response.status().as_u16(), 429);
        assert_eq!(
            response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok()),
            Some("12")
        );
    }

    #[test]
    fn test_envelope_serialization_skips_empty_fields() {
        let envelope = ErrorResponse {
            error: super::super::response::ErrorDetail {
                id: "abc".to_string(),
                message: "broken".to_string(),
                code: None,
                timestamp: chrono::Utc::now(),
                resolution: None,
                stack: None,
            },
        };

        let json = serde_json::to_value(&envelope).unwrap();
        let detail = json.get("error").unwrap();
        assert_eq!(detail.get("id").unwrap(), "abc");
        assert!(detail.get("code").is_none());
        assert!(detail.get("resolution").is_none());
        assert!(detail.get("stack").is_none());
    }
}
