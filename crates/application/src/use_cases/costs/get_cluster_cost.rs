use crate::ports::CostSource;
use crate::services::normalizer::{normalize_namespaces, summarize_cluster};
use crate::services::{CostCache, CostSnapshot};
use chrono::Utc;
use kubecent_domain::{AggregateLevel, ClusterCost, CostQuery, CostWindow, DomainError};
use std::sync::Arc;
use tracing::{debug, info};

pub struct GetClusterCostUseCase {
    source: Arc<dyn CostSource>,
    cache: Arc<CostCache>,
    cluster_name: Arc<str>,
}

impl GetClusterCostUseCase {
    pub fn new(
        source: Arc<dyn CostSource>,
        cache: Arc<CostCache>,
        cluster_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            source,
            cache,
            cluster_name: cluster_name.into(),
        }
    }

    pub async fn execute(&self, window: &CostWindow) -> Result<Arc<ClusterCost>, DomainError> {
        let key = cache_key(window);
        self.cache
            .get_or_set(&key, || async {
                self.fetch(window).await.map(CostSnapshot::Cluster)
            })
            .await?
            .into_cluster()
    }

    /// Fetch and overwrite the cached entry regardless of its freshness.
    pub async fn refresh(&self, window: &CostWindow) -> Result<Arc<ClusterCost>, DomainError> {
        let cost = self.fetch(window).await?;
        self.cache
            .set(&cache_key(window), CostSnapshot::Cluster(Arc::clone(&cost)));
        Ok(cost)
    }

    async fn fetch(&self, window: &CostWindow) -> Result<Arc<ClusterCost>, DomainError> {
        debug!(window = %window, "Fetching cluster cost");
        let raw = self
            .source
            .get_allocation(AggregateLevel::Namespace, window, false)
            .await?;
        let namespaces = normalize_namespaces(&raw);
        let cost = summarize_cluster(&self.cluster_name, &namespaces, Utc::now());

        info!(
            window = %window,
            namespaces = cost.namespaces,
            pods = cost.pods,
            total_cost = %cost.allocation.total_cost,
            "Cluster cost computed"
        );
        Ok(Arc::new(cost))
    }
}

fn cache_key(window: &CostWindow) -> String {
    CostQuery::Cluster {
        window: window.clone(),
    }
    .cache_key()
}
