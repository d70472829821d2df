use kubecent_application::ports::CacheMaintenancePort;
use kubecent_domain::{CostQuery, CostWindow};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 240;

/// Queries kept warm for each window: the cluster summary, both namespace
/// variants and the unfiltered pod list.
pub fn hot_queries(windows: &[CostWindow]) -> Vec<CostQuery> {
    let mut queries = Vec::with_capacity(windows.len() * 4);
    for window in windows {
        queries.push(CostQuery::Cluster {
            window: window.clone(),
        });
        for include_idle in [false, true] {
            queries.push(CostQuery::Namespaces {
                window: window.clone(),
                include_idle,
            });
        }
        queries.push(CostQuery::Pods {
            window: window.clone(),
            namespace: None,
            include_idle: false,
        });
    }
    queries
}

/// Periodically re-fetches a fixed set of queries and overwrites their cache
/// entries. The interval must stay below the cache TTL.
pub struct CostRefreshJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    queries: Vec<CostQuery>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CostRefreshJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>, queries: Vec<CostQuery>) -> Self {
        Self {
            maintenance,
            queries,
            interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
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

    pub fn queries(&self) -> &[CostQuery] {
        &self.queries
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            queries = self.queries.len(),
            interval_secs = self.interval.as_secs(),
            "Starting cost refresh job"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = self.maintenance.run_refresh_cycle(&self.queries) => match result {
                    Ok(outcome) => {
                        debug!(
                            refreshed = outcome.refreshed,
                            failed = outcome.failed,
                            "Cost refresh iteration done"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, code = e.code(), "Cost refresh cycle failed");
                    }
                },
            }
        }

        info!("CostRefreshJob: shutting down");
    }
}
