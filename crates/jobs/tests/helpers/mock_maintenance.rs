#![allow(dead_code)]

use async_trait::async_trait;
use kubecent_application::ports::{
    CacheCleanupOutcome, CacheMaintenancePort, CacheRefreshOutcome,
};
use kubecent_domain::{CostQuery, DomainError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct MockCacheMaintenancePort {
    refresh_call_count: Arc<AtomicU64>,
    cleanup_call_count: Arc<AtomicU64>,
    should_fail_refresh: Arc<RwLock<bool>>,
    should_fail_cleanup: Arc<RwLock<bool>>,
    last_queries: Arc<RwLock<Vec<CostQuery>>>,
    refresh_delay: Arc<RwLock<Option<Duration>>>,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self {
            refresh_call_count: Arc::new(AtomicU64::new(0)),
            cleanup_call_count: Arc::new(AtomicU64::new(0)),
            should_fail_refresh: Arc::new(RwLock::new(false)),
            should_fail_cleanup: Arc::new(RwLock::new(false)),
            last_queries: Arc::new(RwLock::new(Vec::new())),
            refresh_delay: Arc::new(RwLock::new(None)),
        }
    }

    pub fn refresh_call_count(&self) -> u64 {
        self.refresh_call_count.load(Ordering::Relaxed)
    }

    pub fn cleanup_call_count(&self) -> u64 {
        self.cleanup_call_count.load(Ordering::Relaxed)
    }

    pub async fn set_should_fail_refresh(&self, fail: bool) {
        *self.should_fail_refresh.write().await = fail;
    }

    pub async fn set_should_fail_cleanup(&self, fail: bool) {
        *self.should_fail_cleanup.write().await = fail;
    }

    pub async fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.write().await = Some(delay);
    }

    pub async fn last_queries(&self) -> Vec<CostQuery> {
        self.last_queries.read().await.clone()
    }
}

#[async_trait]
impl CacheMaintenancePort for MockCacheMaintenancePort {
    async fn run_refresh_cycle(
        &self,
        queries: &[CostQuery],
    ) -> Result<CacheRefreshOutcome, DomainError> {
        self.refresh_call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_queries.write().await = queries.to_vec();
        let delay = *self.refresh_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.should_fail_refresh.read().await {
            return Err(DomainError::upstream(
                "mock refresh failure",
                "OPENCOST_ALLOCATION_ERROR",
            ));
        }
        Ok(CacheRefreshOutcome {
            candidates: queries.len(),
            refreshed: queries.len(),
            failed: 0,
            cache_size: queries.len(),
        })
    }

    async fn run_cleanup_cycle(&self) -> Result<CacheCleanupOutcome, DomainError> {
        self.cleanup_call_count.fetch_add(1, Ordering::Relaxed);
        if *self.should_fail_cleanup.read().await {
            return Err(DomainError::Internal("mock cleanup failure".into()));
        }
        Ok(CacheCleanupOutcome::default())
    }
}
