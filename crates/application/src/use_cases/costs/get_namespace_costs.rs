use crate::ports::CostSource;
use crate::services::normalizer::normalize_namespaces;
use crate::services::{CostCache, CostSnapshot};
use kubecent_domain::{AggregateLevel, CostQuery, CostWindow, DomainError, NamespaceCostReport};
use std::sync::Arc;
use tracing::{debug, info};

pub struct GetNamespaceCostsUseCase {
    source: Arc<dyn CostSource>,
    cache: Arc<CostCache>,
}

impl GetNamespaceCostsUseCase {
    pub fn new(source: Arc<dyn CostSource>, cache: Arc<CostCache>) -> Self {
        Self { source, cache }
    }

    pub async fn execute(
        &self,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<Arc<NamespaceCostReport>, DomainError> {
        let key = cache_key(window, include_idle);
        self.cache
            .get_or_set(&key, || async {
                self.fetch(window, include_idle)
                    .await
                    .map(CostSnapshot::Namespaces)
            })
            .await?
            .into_namespaces()
    }

    pub async fn refresh(
        &self,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<Arc<NamespaceCostReport>, DomainError> {
        let report = self.fetch(window, include_idle).await?;
        self.cache.set(
            &cache_key(window, include_idle),
            CostSnapshot::Namespaces(Arc::clone(&report)),
        );
        Ok(report)
    }

    async fn fetch(
        &self,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<Arc<NamespaceCostReport>, DomainError> {
        debug!(window = %window, include_idle, "Fetching namespace costs");
        let raw = self
            .source
            .get_allocation(AggregateLevel::Namespace, window, include_idle)
            .await?;
        let report = NamespaceCostReport::new(normalize_namespaces(&raw), window.clone());

        info!(
            window = %window,
            include_idle,
            namespaces = report.item_count,
            total = %report.total,
            "Namespace costs normalized"
        );
        Ok(Arc::new(report))
    }
}

fn cache_key(window: &CostWindow, include_idle: bool) -> String {
    CostQuery::Namespaces {
        window: window.clone(),
        include_idle,
    }
    .cache_key()
}
