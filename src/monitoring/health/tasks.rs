//! Background health check task

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::registry::HealthRegistry;

impl HealthRegistry {
    /// Start periodic aggregation, bypassing the cache on every pass
    pub fn start(self: &Arc<Self>, interval: Duration) -> Option<JoinHandle<()>> {
        if interval.is_zero() {
            debug!("Periodic health checks disabled");
            return None;
        }
        if self.active.swap(true, Ordering::AcqRel) {
            debug!("Health check task already running");
            return None;
        }

        info!("Starting health checks every {:?}", interval);
        let registry = Arc::clone(self);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                ticker.tick().await;

                if !registry.is_active() {
                    break;
                }

                let snapshot = registry.check_health(false).await;
                debug!("Periodic health check: {}", snapshot.status);
            }

            debug!("Health check task stopped");
        }))
    }

    /// Stop the periodic task after its current tick
    pub fn stop(&self) {
        self.active.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
