//! Error types for opsgate

use thiserror::Error;

/// Result type alias for opsgate
pub type Result<T> = std::result::Result<T, OpsError>;

/// Main error type for opsgate
///
/// Every variant carries enough information to be classified without
/// inspecting its message: see [`OpsError::status_code`],
/// [`OpsError::severity`] and [`OpsError::category`].
#[derive(Error, Debug)]
pub enum OpsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Pattern compilation errors
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Authorization errors
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// Database errors reported by a collaborator
    #[error("Database error: {0}")]
    Database(String),

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Business rule violations
    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    /// Dependency probe errors
    #[error("Health probe '{probe}' failed: {message}")]
    Probe { probe: String, message: String },

    /// Record sink errors
    #[error("Sink error: {0}")]
    Sink(String),

    /// Notification errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Service unavailable errors
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Unrecoverable errors that must page an operator
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
