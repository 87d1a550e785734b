//! # opsgate
//!
//! Operational monitoring for HTTP services: dependency health aggregation,
//! error classification with ordered recovery, and request metrics.
//!
//! ## Features
//!
//! - **Health rollup**: Named dependency probes, critical vs. non-critical,
//!   rolled up into HEALTHY / DEGRADED / UNHEALTHY with a short-lived cache
//! - **Error handling**: Severity and category inference, recovery strategies
//!   tried in registration order, sink persistence and critical notifications
//! - **Request metrics**: Per-request timing, sanitized request logs,
//!   percentiles and a sliding requests-per-minute window
//! - **Actix integration**: Middleware and `/health` endpoints
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use opsgate::monitoring::MonitoringSystem;
//! use opsgate::monitoring::health::{DependencyKind, DependencyProbe, ProbeReport};
//! use opsgate::Config;
//!
//! #[tokio::main]
//! async fn main() -> opsgate::Result<()> {
//!     let monitoring = MonitoringSystem::from_config(&Config::default()).await?;
//!     monitoring.health().register(
//!         DependencyProbe::from_fn("db", DependencyKind::Database, || async {
//!             Ok(ProbeReport::healthy())
//!         })
//!         .critical(true),
//!     );
//!
//!     let snapshot = monitoring.health().check_health(false).await;
//!     println!("{}", snapshot.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Server Mode
//!
//! ```rust,no_run
//! use opsgate::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> opsgate::Result<()> {
//!     let config = Config::from_file("config/opsgate.yaml").await?;
//!     server::run_server(config).await
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod monitoring;
pub mod server;
pub mod utils;

pub use config::Config;
pub use monitoring::MonitoringSystem;
pub use utils::error::{OpsError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information captured by the build script
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix timestamp of the build
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info() {
        let info = BuildInfo::current();
        assert_eq!(info.version, VERSION);
        assert!(!info.git_hash.is_empty());
        assert!(!info.rust_version.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "opsgate");
        assert_eq!(DESCRIPTION, env!("CARGO_PKG_DESCRIPTION"));
    }
}
