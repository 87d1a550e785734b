//! Critical error notifiers

use super::CriticalNotifier;
use crate::monitoring::errors::ErrorRecord;
use crate::utils::error::{OpsError, Result};
use std::time::Duration;
use tracing::error;

/// Reports critical errors through the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl CriticalNotifier for LogNotifier {
    async fn notify_critical(&self, record: &ErrorRecord) -> Result<()> {
        error!(
            error_id = %record.id,
            category = %record.category,
            status_code = record.status_code,
            path = record.path.as_deref().unwrap_or("-"),
            "CRITICAL error: {}",
            record.message
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Posts critical errors to a webhook as JSON
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl CriticalNotifier for WebhookNotifier {
    async fn notify_critical(&self, record: &ErrorRecord) -> Result<()> {
        let payload = serde_json::json!({
            "text": format!("[CRITICAL] {}: {}", record.category, record.message),
            "error": record,
            "timestamp": record.timestamp.timestamp(),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| OpsError::Notification(format!("Failed to send webhook: {}", e)))?;

        if !response.status().is_success() {
            return Err(OpsError::Notification(format!(
                "Webhook returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
