use crate::ports::CostSource;
use crate::services::normalizer::normalize_pods;
use crate::services::{CostCache, CostSnapshot};
use kubecent_domain::{AggregateLevel, CostQuery, CostWindow, DomainError, PodCostReport};
use std::sync::Arc;
use tracing::{debug, info};

pub struct GetPodCostsUseCase {
    source: Arc<dyn CostSource>,
    cache: Arc<CostCache>,
}

impl GetPodCostsUseCase {
    pub fn new(source: Arc<dyn CostSource>, cache: Arc<CostCache>) -> Self {
        Self { source, cache }
    }

    /// Pod costs, optionally restricted to one namespace. The total covers
    /// only the pods that survive the filter.
    pub async fn execute(
        &self,
        namespace: Option<&str>,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<Arc<PodCostReport>, DomainError> {
        let key = cache_key(namespace, window, include_idle);
        self.cache
            .get_or_set(&key, || async {
                self.fetch(namespace, window, include_idle)
                    .await
                    .map(CostSnapshot::Pods)
            })
            .await?
            .into_pods()
    }

    pub async fn refresh(
        &self,
        namespace: Option<&str>,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<Arc<PodCostReport>, DomainError> {
        let report = self.fetch(namespace, window, include_idle).await?;
        self.cache.set(
            &cache_key(namespace, window, include_idle),
            CostSnapshot::Pods(Arc::clone(&report)),
        );
        Ok(report)
    }

    async fn fetch(
        &self,
        namespace: Option<&str>,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<Arc<PodCostReport>, DomainError> {
        debug!(window = %window, namespace = ?namespace, include_idle, "Fetching pod costs");
        let raw = self
            .source
            .get_allocation(AggregateLevel::Pod, window, include_idle)
            .await?;
        let pods = normalize_pods(&raw, namespace);
        let report = PodCostReport::new(pods, namespace.map(str::to_string), window.clone());

        info!(
            window = %window,
            namespace = ?namespace,
            pods = report.item_count,
            total = %report.total,
            "Pod costs normalized"
        );
        Ok(Arc::new(report))
    }
}

fn cache_key(namespace: Option<&str>, window: &CostWindow, include_idle: bool) -> String {
    CostQuery::Pods {
        window: window.clone(),
        namespace: namespace.map(Arc::from),
        include_idle,
    }
    .cache_key()
}
