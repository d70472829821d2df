use async_trait::async_trait;
use futures::future::join_all;
use kubecent_application::ports::{
    CacheCleanupOutcome, CacheMaintenancePort, CacheRefreshOutcome,
};
use kubecent_application::services::CostCache;
use kubecent_application::use_cases::{
    GetClusterCostUseCase, GetCostHistoryUseCase, GetMonthlyCostUseCase,
    GetNamespaceCostsUseCase, GetPodCostsUseCase,
};
use kubecent_domain::{CostQuery, DomainError};
use std::sync::Arc;
use tracing::{info, warn};

/// Infrastructure adapter implementing `CacheMaintenancePort` for the cost
/// cache.
///
/// Refresh goes through each use case's `refresh` path, so the request path
/// and the refresher write the same keys with the same normalization. Keys
/// within a cycle refresh concurrently; a stalled upstream call only delays
/// its own key.
pub struct CostCacheMaintenance {
    cache: Arc<CostCache>,
    cluster: Arc<GetClusterCostUseCase>,
    namespaces: Arc<GetNamespaceCostsUseCase>,
    pods: Arc<GetPodCostsUseCase>,
    monthly: Arc<GetMonthlyCostUseCase>,
    history: Arc<GetCostHistoryUseCase>,
}

impl CostCacheMaintenance {
    pub fn new(
        cache: Arc<CostCache>,
        cluster: Arc<GetClusterCostUseCase>,
        namespaces: Arc<GetNamespaceCostsUseCase>,
        pods: Arc<GetPodCostsUseCase>,
        monthly: Arc<GetMonthlyCostUseCase>,
        history: Arc<GetCostHistoryUseCase>,
    ) -> Self {
        Self {
            cache,
            cluster,
            namespaces,
            pods,
            monthly,
            history,
        }
    }

    async fn refresh_query(&self, query: &CostQuery) -> Result<(), DomainError> {
        match query {
            CostQuery::Cluster { window } => self.cluster.refresh(window).await.map(drop),
            CostQuery::Namespaces {
                window,
                include_idle,
            } => self
                .namespaces
                .refresh(window, *include_idle)
                .await
                .map(drop),
            CostQuery::Pods {
                window,
                namespace,
                include_idle,
            } => self
                .pods
                .refresh(namespace.as_deref(), window, *include_idle)
                .await
                .map(drop),
            CostQuery::Monthly { months } => self.monthly.refresh(*months).await.map(drop),
            CostQuery::History { window } => self.history.refresh(window).await.map(drop),
        }
    }
}

#[async_trait]
impl CacheMaintenancePort for CostCacheMaintenance {
    async fn run_refresh_cycle(
        &self,
        queries: &[CostQuery],
    ) -> Result<CacheRefreshOutcome, DomainError> {
        let mut outcome = CacheRefreshOutcome {
            candidates: queries.len(),
            ..Default::default()
        };
        let mut last_error = None;

        let results = join_all(
            queries
                .iter()
                .map(|query| async move { (query, self.refresh_query(query).await) }),
        )
        .await;

        for (query, result) in results {
            match result {
                Ok(()) => outcome.refreshed += 1,
                Err(e) => {
                    warn!(key = %query, error = %e, "Cache refresh failed for key");
                    outcome.failed += 1;
                    last_error = Some(e);
                }
            }
        }
        outcome.cache_size = self.cache.len();

        if outcome.refreshed == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        info!(
            candidates = outcome.candidates,
            refreshed = outcome.refreshed,
            failed = outcome.failed,
            cache_size = outcome.cache_size,
            "Cache refresh cycle completed"
        );
        Ok(outcome)
    }

    async fn run_cleanup_cycle(&self) -> Result<CacheCleanupOutcome, DomainError> {
        let entries_removed = self.cache.cleanup_expired();
        Ok(CacheCleanupOutcome {
            entries_removed,
            cache_size: self.cache.len(),
        })
    }
}
