use crate::ports::CostSource;
use crate::services::{CacheStats, CostCache};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub opencost: bool,
    pub cache: CacheStats,
}

pub struct CheckUpstreamHealthUseCase {
    source: Arc<dyn CostSource>,
    cache: Arc<CostCache>,
}

impl CheckUpstreamHealthUseCase {
    pub fn new(source: Arc<dyn CostSource>, cache: Arc<CostCache>) -> Self {
        Self { source, cache }
    }

    pub async fn execute(&self) -> HealthReport {
        let opencost = self.source.health_check().await;
        if !opencost {
            warn!("Cost API health probe failed");
        }
        HealthReport {
            status: if opencost {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            opencost,
            cache: self.cache.stats(),
        }
    }
}
