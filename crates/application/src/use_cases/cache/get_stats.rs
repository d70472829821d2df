use crate::services::{CacheStats, CostCache};
use std::sync::Arc;

pub struct GetCacheStatsUseCase {
    cache: Arc<CostCache>,
}

impl GetCacheStatsUseCase {
    pub fn new(cache: Arc<CostCache>) -> Self {
        Self { cache }
    }

    pub fn execute(&self) -> CacheStats {
        self.cache.stats()
    }
}
