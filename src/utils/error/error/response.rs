//! HTTP response handling for errors

use super::types::OpsError;
use crate::monitoring::errors::ErrorRecord;
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for OpsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(OpsError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        // Only reached when no error-capture middleware sits above the handler
        let error_response = ErrorResponse {
            error: ErrorDetail {
                id: uuid::Uuid::now_v7().to_string(),
                message: self.to_string(),
                code: Some(self.code().to_string()),
                timestamp: chrono::Utc::now(),
                resolution: None,
                stack: None,
            },
        };

        let mut builder = HttpResponse::build(ResponseError::status_code(self));
        if let Some(secs) = self.retry_after_secs() {
            builder.insert_header((RETRY_AFTER, secs.to_string()));
        }
        builder.json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    /// Build the client-facing envelope for a handled error
    pub fn from_record(record: &ErrorRecord, include_stack: bool) -> Self {
        Self {
            error: ErrorDetail {
                id: record.id.clone(),
                message: record.message.clone(),
                code: record.code.clone(),
                timestamp: record.timestamp,
                resolution: record.resolution.clone(),
                stack: if include_stack {
                    record.stack.clone()
                } else {
                    None
                },
            },
        }
    }

    /// Render the envelope as an HTTP response with the record's status code
    pub fn into_http_response(self, status_code: u16, retry_after_secs: Option<u64>) -> HttpResponse {
        let status =
            StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = HttpResponse::build(status);
        if let Some(secs) = retry_after_secs {
            builder.insert_header((RETRY_AFTER, secs.to_string()));
        }
        builder.json(self)
    }
}

/// A handled error whose envelope is already decided
///
/// Carried as an `actix_web::Error` when no response is left to replace, so
/// actix renders the envelope itself.
#[derive(Debug, thiserror::Error)]
#[error("{}", .envelope.error.message)]
pub struct HandledError {
    envelope: ErrorResponse,
    status_code: u16,
    retry_after_secs: Option<u64>,
    request_id: Option<String>,
}

impl HandledError {
    pub fn new(
        envelope: ErrorResponse,
        status_code: u16,
        retry_after_secs: Option<u64>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            envelope,
            status_code,
            retry_after_secs,
            request_id,
        }
    }

    /// Id of the error record behind this envelope
    pub fn id(&self) -> &str {
        &self.envelope.error.id
    }
}

impl ResponseError for HandledError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = self
            .envelope
            .clone()
            .into_http_response(self.status_code, self.retry_after_secs);
        if let Some(value) = self
            .request_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-request-id"), value);
        }
        response
    }
}
