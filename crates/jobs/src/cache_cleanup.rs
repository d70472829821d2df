use kubecent_application::ports::CacheMaintenancePort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

pub struct CacheCleanupJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheCleanupJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>) -> Self {
        Self {
            maintenance,
            interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting cache cleanup job"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            match self.maintenance.run_cleanup_cycle().await {
                Ok(outcome) => {
                    if outcome.entries_removed > 0 {
                        info!(
                            entries_removed = outcome.entries_removed,
                            cache_size = outcome.cache_size,
                            "Cache cleanup cycle completed"
                        );
                    }
                }
                Err(e) => {
                    error!(error = %e, "Cache cleanup cycle failed");
                }
            }
        }

        info!("CacheCleanupJob: shutting down");
    }
}
