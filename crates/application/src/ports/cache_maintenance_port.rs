use async_trait::async_trait;
use kubecent_domain::{CostQuery, DomainError};

/// Outcome of a cache refresh cycle.
#[derive(Debug, Default, Clone)]
pub struct CacheRefreshOutcome {
    pub candidates: usize,
    pub refreshed: usize,
    pub failed: usize,
    pub cache_size: usize,
}

/// Outcome of an expired-entry cleanup cycle.
#[derive(Debug, Default, Clone)]
pub struct CacheCleanupOutcome {
    pub entries_removed: usize,
    pub cache_size: usize,
}

/// Port for cost cache maintenance (proactive refresh + expiry cleanup).
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Fetch every query from upstream and overwrite its cache entry,
    /// regardless of whether the current entry is still fresh.
    async fn run_refresh_cycle(
        &self,
        queries: &[CostQuery],
    ) -> Result<CacheRefreshOutcome, DomainError>;

    /// Remove expired entries to bound memory.
    async fn run_cleanup_cycle(&self) -> Result<CacheCleanupOutcome, DomainError>;
}
