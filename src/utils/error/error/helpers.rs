//! Helper functions for creating specific error types and reading their taxonomy

use super::types::OpsError;
use crate::monitoring::errors::{ErrorCategory, ErrorSeverity};

/// Helper functions for creating specific errors
impl OpsError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    pub fn authorization<S: Into<String>>(message: S) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn rate_limit<S: Into<String>>(message: S, retry_after_secs: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after_secs,
        }
    }

    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database(message.into())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn business_rule<S: Into<String>>(message: S) -> Self {
        Self::BusinessRule(message.into())
    }

    pub fn probe<P: Into<String>, S: Into<String>>(probe: P, message: S) -> Self {
        Self::Probe {
            probe: probe.into(),
            message: message.into(),
        }
    }

    pub fn sink<S: Into<String>>(message: S) -> Self {
        Self::Sink(message.into())
    }

    pub fn notification<S: Into<String>>(message: S) -> Self {
        Self::Notification(message.into())
    }

    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn fatal<S: Into<String>>(message: S) -> Self {
        Self::Fatal(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code this error surfaces as
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::Serialization(_) => 400,
            Self::Auth(_) => 401,
            Self::Authorization(_) => 403,
            Self::NotFound(_) => 404,
            Self::Timeout(_) => 408,
            Self::Conflict(_) => 409,
            Self::BusinessRule(_) => 422,
            Self::RateLimit { .. } => 429,
            Self::Network(_) | Self::HttpClient(_) => 502,
            Self::Database(_) | Self::Probe { .. } | Self::Unavailable(_) => 503,
            Self::Config(_)
            | Self::Yaml(_)
            | Self::Io(_)
            | Self::Pattern(_)
            | Self::Sink(_)
            | Self::Notification(_)
            | Self::Fatal(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::HttpClient(_) => "HTTP_CLIENT_ERROR",
            Self::Pattern(_) => "PATTERN_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Authorization(_) => "AUTHORIZATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::RateLimit { .. } => "RATE_LIMIT_EXCEEDED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Probe { .. } => "PROBE_FAILED",
            Self::Sink(_) => "SINK_ERROR",
            Self::Notification(_) => "NOTIFICATION_ERROR",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Fatal(_) => "FATAL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Severity of this error in the classification taxonomy
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Fatal(_) => ErrorSeverity::Critical,
            Self::Validation(_)
            | Self::BadRequest(_)
            | Self::NotFound(_)
            | Self::Conflict(_)
            | Self::Serialization(_) => ErrorSeverity::Low,
            Self::Auth(_)
            | Self::Authorization(_)
            | Self::RateLimit { .. }
            | Self::BusinessRule(_)
            | Self::Timeout(_) => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    /// Category of this error in the classification taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::Serialization(_) => {
                ErrorCategory::Validation
            }
            Self::Auth(_) => ErrorCategory::Authentication,
            Self::Authorization(_) => ErrorCategory::Authorization,
            Self::Database(_) => ErrorCategory::Database,
            Self::Network(_) | Self::HttpClient(_) | Self::Timeout(_) => ErrorCategory::Network,
            Self::BusinessRule(_) | Self::Conflict(_) | Self::RateLimit { .. } => {
                ErrorCategory::BusinessLogic
            }
            Self::Config(_)
            | Self::Yaml(_)
            | Self::Io(_)
            | Self::Pattern(_)
            | Self::Sink(_)
            | Self::Notification(_)
            | Self::Unavailable(_)
            | Self::Probe { .. }
            | Self::Fatal(_)
            | Self::Internal(_) => ErrorCategory::System,
            Self::NotFound(_) => ErrorCategory::Unknown,
        }
    }

    /// Seconds a client should wait before retrying, for rate-limit-shaped errors
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimit {
                retry_after_secs, ..
            } => Some(retry_after_secs.unwrap_or(60)),
            _ => None,
        }
    }
}
