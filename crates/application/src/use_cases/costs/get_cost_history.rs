use crate::ports::CostSource;
use crate::services::normalizer::{normalize_namespaces, summarize_cluster, spread_history};
use crate::services::{CostCache, CostSnapshot};
use chrono::Utc;
use kubecent_domain::{AggregateLevel, CostHistory, CostQuery, CostWindow, DomainError};
use std::sync::Arc;
use tracing::debug;

/// Daily cost trend for a window. The window's cluster allocation is spread
/// evenly across its days, ending today.
pub struct GetCostHistoryUseCase {
    source: Arc<dyn CostSource>,
    cache: Arc<CostCache>,
}

impl GetCostHistoryUseCase {
    pub fn new(source: Arc<dyn CostSource>, cache: Arc<CostCache>) -> Self {
        Self { source, cache }
    }

    pub async fn execute(&self, window: &CostWindow) -> Result<Arc<CostHistory>, DomainError> {
        let key = cache_key(window);
        self.cache
            .get_or_set(&key, || async {
                self.fetch(window).await.map(CostSnapshot::History)
            })
            .await?
            .into_history()
    }

    pub async fn refresh(&self, window: &CostWindow) -> Result<Arc<CostHistory>, DomainError> {
        let history = self.fetch(window).await?;
        self.cache
            .set(&cache_key(window), CostSnapshot::History(Arc::clone(&history)));
        Ok(history)
    }

    async fn fetch(&self, window: &CostWindow) -> Result<Arc<CostHistory>, DomainError> {
        debug!(window = %window, "Fetching cost history");
        let raw = self
            .source
            .get_allocation(AggregateLevel::Namespace, window, false)
            .await?;
        let now = Utc::now();
        let cluster = summarize_cluster("", &normalize_namespaces(&raw), now);
        Ok(Arc::new(spread_history(
            window,
            &cluster.allocation,
            now.date_naive(),
        )))
    }
}

fn cache_key(window: &CostWindow) -> String {
    CostQuery::History {
        window: window.clone(),
    }
    .cache_key()
}
