//! Dependency probes and built-in checks

use super::types::{DependencyKind, ProbeReport};
use crate::config::{ProbeCheckConfig, ProbeConfig};
use crate::utils::error::{OpsError, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Something that can report the health of a dependency
#[async_trait::async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> Result<ProbeReport>;
}

/// Health check backed by an async closure
pub struct FnCheck {
    check: Box<dyn Fn() -> BoxFuture<'static, Result<ProbeReport>> + Send + Sync>,
}

impl FnCheck {
    pub fn new<F, Fut>(check: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ProbeReport>> + Send + 'static,
    {
        Self {
            check: Box::new(move || check().boxed()),
        }
    }
}

#[async_trait::async_trait]
impl HealthCheck for FnCheck {
    async fn check(&self) -> Result<ProbeReport> {
        (self.check)().await
    }
}

/// A named, registered health check
#[derive(Clone)]
pub struct DependencyProbe {
    name: String,
    kind: DependencyKind,
    critical: bool,
    check: Arc<dyn HealthCheck>,
}

impl DependencyProbe {
    pub fn new(name: impl Into<String>, kind: DependencyKind, check: impl HealthCheck + 'static) -> Self {
        Self {
            name: name.into(),
            kind,
            critical: false,
            check: Arc::new(check),
        }
    }

    /// Probe backed by an async closure
    pub fn from_fn<F, Fut>(name: impl Into<String>, kind: DependencyKind, check: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ProbeReport>> + Send + 'static,
    {
        Self::new(name, kind, FnCheck::new(check))
    }

    /// Build a probe declared in configuration
    pub fn from_config(config: &ProbeConfig, client: &reqwest::Client) -> Self {
        let probe = match &config.check {
            ProbeCheckConfig::Http { url, timeout_ms } => Self::new(
                config.name.clone(),
                config.kind,
                HttpCheck::new(client.clone(), url.clone(), Duration::from_millis(*timeout_ms)),
            ),
            ProbeCheckConfig::Tcp {
                address,
                timeout_ms,
            } => Self::new(
                config.name.clone(),
                config.kind,
                TcpCheck::new(address.clone(), Duration::from_millis(*timeout_ms)),
            ),
            ProbeCheckConfig::File { path } => {
                Self::new(config.name.clone(), config.kind, FileCheck::new(path))
            }
        };
        probe.critical(config.critical)
    }

    /// Mark whether an unhealthy result fails the whole system
    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub(super) fn check(&self) -> &Arc<dyn HealthCheck> {
        &self.check
    }
}

impl std::fmt::Debug for DependencyProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyProbe")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("critical", &self.critical)
            .finish()
    }
}

/// GET a URL: 2xx is healthy, any other status degraded
#[derive(Debug, Clone)]
pub struct HttpCheck {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpCheck {
    pub fn new(client: reqwest::Client, url: String, timeout: Duration) -> Self {
        Self {
            client,
            url,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl HealthCheck for HttpCheck {
    async fn check(&self) -> Result<ProbeReport> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| OpsError::network(format!("GET {} failed: {}", self.url, e)))?;
        let elapsed = start.elapsed().as_millis() as u64;
        let status = response.status();

        let report = if status.is_success() {
            ProbeReport::healthy()
        } else {
            ProbeReport::degraded(format!("GET {} returned {}", self.url, status))
        };

        Ok(report
            .with_response_time(elapsed)
            .with_detail("statusCode", status.as_u16().into()))
    }
}

/// Open a TCP connection
#[derive(Debug, Clone)]
pub struct TcpCheck {
    address: String,
    timeout: Duration,
}

impl TcpCheck {
    pub fn new(address: String, timeout: Duration) -> Self {
        Self { address, timeout }
    }
}

#[async_trait::async_trait]
impl HealthCheck for TcpCheck {
    async fn check(&self) -> Result<ProbeReport> {
        let start = Instant::now();
        match tokio::time::timeout(self.timeout, tokio::net::TcpStream::connect(&self.address)).await {
            Ok(Ok(_stream)) => {
                Ok(ProbeReport::healthy().with_response_time(start.elapsed().as_millis() as u64))
            }
            Ok(Err(e)) => Err(OpsError::network(format!(
                "connect to {} failed: {}",
                self.address, e
            ))),
            Err(_) => Err(OpsError::timeout(format!(
                "connect to {} timed out after {:?}",
                self.address, self.timeout
            ))),
        }
    }
}

/// Require a filesystem path to exist
#[derive(Debug, Clone)]
pub struct FileCheck {
    path: PathBuf,
}

impl FileCheck {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl HealthCheck for FileCheck {
    async fn check(&self) -> Result<ProbeReport> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => Ok(ProbeReport::healthy()
                .with_detail("isDir", metadata.is_dir().into())
                .with_detail("sizeBytes", metadata.len().into())),
            Err(e) => Ok(ProbeReport::unhealthy(format!(
                "{} is not accessible: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
