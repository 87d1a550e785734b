//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::middleware::{ErrorCaptureMiddleware, MetricsMiddleware, RequestIdMiddleware};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{OpsError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::io::ErrorKind;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server and its monitoring system
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let state = AppState::from_config(config.clone()).await?;
        Ok(Self::from_state(state))
    }

    /// Serve an already assembled state
    pub fn from_state(state: AppState) -> Self {
        Self {
            config: state.config.server.clone(),
            state,
        }
    }

    /// Create the Actix-web application
    ///
    /// Middleware runs outermost first: tracing span, request id, timing,
    /// then error capture closest to the handlers.
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(ErrorCaptureMiddleware)
            .wrap(MetricsMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(DefaultHeaders::new().add(("Server", crate::NAME)))
            .wrap(TracingLogger::default())
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server and run until shutdown
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;
        let monitoring = self.state.monitoring.clone();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }
        let server = server
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        monitoring.start();
        info!("HTTP server listening on {}", bind_addr);

        let result = server
            .await
            .map_err(|e| OpsError::unavailable(format!("Server error: {}", e)));

        monitoring.stop();
        info!("HTTP server stopped");
        result
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Describe a bind failure with a hint for the common causes
    pub(crate) fn format_bind_error(error: std::io::Error, bind_addr: &str, port: u16) -> OpsError {
        match error.kind() {
            ErrorKind::AddrInUse => OpsError::unavailable(format!(
                "Port {} is already in use; pick another with --port {} or OPSGATE_PORT={}",
                port,
                port.saturating_add(1),
                port.saturating_add(1)
            )),
            ErrorKind::PermissionDenied => OpsError::unavailable(format!(
                "Permission denied for port {}; use a port >= 1024",
                port
            )),
            _ => OpsError::unavailable(format!("Failed to bind to {}: {}", bind_addr, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    #[test]
    fn test_format_bind_error_address_in_use() {
        let error = Error::new(ErrorKind::AddrInUse, "Address already in use");
        let message = HttpServer::format_bind_error(error, "0.0.0.0:8080", 8080).to_string();
        assert!(message.contains("8080"));
        assert!(message.contains("already in use"));
        assert!(message.contains("8081"));
    }

    #[test]
    fn test_format_bind_error_permission_denied() {
        let error = Error::new(ErrorKind::PermissionDenied, "Permission denied");
        let message = HttpServer::format_bind_error(error, "0.0.0.0:80", 80).to_string();
        assert!(message.contains("Permission denied"));
        assert!(message.contains("1024"));
    }

    #[test]
    fn test_format_bind_error_other() {
        let error = Error::other("boom");
        let message = HttpServer::format_bind_error(error, "127.0.0.1:9000", 9000).to_string();
        assert!(message.contains("127.0.0.1:9000"));
        assert!(message.contains("boom"));
    }
}
