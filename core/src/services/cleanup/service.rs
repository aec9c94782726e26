use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use vp_shared::config::verification::DEFAULT_CLEANUP_INTERVAL_SECONDS;
use vp_shared::CleanupConfig;

use crate::errors::DomainResult;
use crate::repositories::VerificationRecordStore;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CleanupServiceConfig {
    /// How often the background task runs (in seconds)
    pub interval_seconds: u64,
    /// Whether the background task is started at all
    pub enabled: bool,
}

impl Default for CleanupServiceConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
            enabled: true,
        }
    }
}

impl From<&CleanupConfig> for CleanupServiceConfig {
    fn from(config: &CleanupConfig) -> Self {
        Self {
            interval_seconds: config.interval_seconds,
            enabled: config.enabled,
        }
    }
}

/// Service for deleting expired verification records
pub struct CleanupService<R: VerificationRecordStore + 'static> {
    store: Arc<R>,
    config: CleanupServiceConfig,
}

impl<R: VerificationRecordStore + 'static> CleanupService<R> {
    /// Create a new cleanup service
    pub fn new(store: Arc<R>, config: CleanupServiceConfig) -> Self {
        Self { store, config }
    }

    /// Delete every record whose expiry is at or before now
    ///
    /// Finding and removing happen in one unit of work with a single commit,
    /// even when nothing has expired.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    /// * `Err(DomainError)` - If the store fails
    pub async fn remove_expired_records(&self) -> DomainResult<usize> {
        let now = Utc::now();

        let mut unit = self.store.begin().await?;
        let expired = unit.find_expired(now).await?;
        if !expired.is_empty() {
            unit.remove_range(&expired).await?;
        }
        let affected = unit.commit().await?;

        if affected > 0 {
            info!(found = expired.len(), deleted = affected, "Removed expired verification records");
        } else {
            debug!("No expired verification records");
        }

        Ok(affected as usize)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled. A failed run is logged and the
    /// next tick tries again.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Verification cleanup service is disabled");
            return None;
        }

        let interval = Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Verification cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.remove_expired_records().await {
                    error!(error = %e, "Verification cleanup cycle failed");
                }
            }
        }))
    }
}
