//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{OpsError, Result};
use tracing::info;

/// Server builder for easier configuration
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the configuration and build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| OpsError::Config("Configuration is required".to_string()))?;
        config.validate()?;

        HttpServer::new(&config).await
    }
}

/// Build the server from `config` and serve until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    info!(
        "Starting {} {} ({})",
        crate::NAME,
        config.version(),
        config.environment
    );

    let server = ServerBuilder::new().with_config(config).build().await?;
    info!("Server starting at: http://{}", server.config().address());
    info!("Health endpoints:");
    info!("   GET  /health[?cache=false]");
    info!("   GET  /health/status | /health/live | /health/ready");
    info!("   GET  /health/stats | /health/history | /health/dependency/{{name}}");
    info!("   GET  /health/metrics | /health/errors | /health/version");

    server.start().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_requires_config() {
        let result = ServerBuilder::new().build().await;
        assert!(matches!(result, Err(OpsError::Config(_))));
    }

    #[tokio::test]
    async fn test_builder_rejects_invalid_config() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = ServerBuilder::new().with_config(config).build().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_builder_builds_server() {
        let server = ServerBuilder::new()
            .with_config(Config::default())
            .build()
            .await
            .unwrap();
        assert_eq!(server.config().port, 8080);
        assert!(server.state().health().probe_names().is_empty());
    }
}
