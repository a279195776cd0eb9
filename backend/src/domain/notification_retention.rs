//! Background purge of notifications past their retention window.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::notification::retention_cutoff;
use super::ports::{NotificationRepository, NotificationRepositoryError};

/// Default pause between purge passes.
pub const DEFAULT_RETENTION_INTERVAL: Duration = Duration::from_secs(3600);

/// Periodically deletes notifications older than the retention window.
#[derive(Clone)]
pub struct NotificationRetentionWorker {
    notifications: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl NotificationRetentionWorker {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            notifications,
            clock,
            interval,
        }
    }

    /// Run a single purge pass, returning the number of rows removed.
    pub async fn run_once(&self) -> Result<u64, NotificationRepositoryError> {
        let cutoff = retention_cutoff(self.clock.utc());
        let purged = self.notifications.delete_created_before(cutoff).await?;
        if purged > 0 {
            info!(purged, %cutoff, "expired notifications purged");
        } else {
            debug!(%cutoff, "no expired notifications");
        }
        Ok(purged)
    }

    /// Purge forever. The first pass runs immediately; failures are logged
    /// and the next tick retries.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(error) = self.run_once().await {
                error!(%error, "notification purge failed");
            }
        }
    }
}
