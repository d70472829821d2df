use super::cache_manager::CacheManager;
use kubecent_domain::{
    ClusterCost, CostHistory, DomainError, MonthlyCostReport, NamespaceCostReport, PodCostReport,
};
use std::sync::Arc;

/// Value stored in the cost cache. One variant per query dimension so a
/// single cache instance can hold every report type.
#[derive(Debug, Clone)]
pub enum CostSnapshot {
    Cluster(Arc<ClusterCost>),
    Namespaces(Arc<NamespaceCostReport>),
    Pods(Arc<PodCostReport>),
    Monthly(Arc<MonthlyCostReport>),
    History(Arc<CostHistory>),
}

pub type CostCache = CacheManager<CostSnapshot>;

impl CostSnapshot {
    pub fn dimension(&self) -> &'static str {
        match self {
            CostSnapshot::Cluster(_) => "cluster",
            CostSnapshot::Namespaces(_) => "namespaces",
            CostSnapshot::Pods(_) => "pods",
            CostSnapshot::Monthly(_) => "monthly",
            CostSnapshot::History(_) => "history",
        }
    }

    fn mismatch(self, expected: &str) -> DomainError {
        DomainError::Internal(format!(
            "cache held a {} snapshot where {} was expected",
            self.dimension(),
            expected
        ))
    }

    pub fn into_cluster(self) -> Result<Arc<ClusterCost>, DomainError> {
        match self {
            CostSnapshot::Cluster(v) => Ok(v),
            other => Err(other.mismatch("cluster")),
        }
    }

    pub fn into_namespaces(self) -> Result<Arc<NamespaceCostReport>, DomainError> {
        match self {
            CostSnapshot::Namespaces(v) => Ok(v),
            other => Err(other.mismatch("namespaces")),
        }
    }

    pub fn into_pods(self) -> Result<Arc<PodCostReport>, DomainError> {
        match self {
            CostSnapshot::Pods(v) => Ok(v),
            other => Err(other.mismatch("pods")),
        }
    }

    pub fn into_monthly(self) -> Result<Arc<MonthlyCostReport>, DomainError> {
        match self {
            CostSnapshot::Monthly(v) => Ok(v),
            other => Err(other.mismatch("monthly")),
        }
    }

    pub fn into_history(self) -> Result<Arc<CostHistory>, DomainError> {
        match self {
            CostSnapshot::History(v) => Ok(v),
            other => Err(other.mismatch("history")),
        }
    }
}
