pub mod cache;
pub mod costs;
pub mod health;
pub mod optimization;

pub use cache::GetCacheStatsUseCase;
pub use costs::{
    GetClusterCostUseCase, GetCostHistoryUseCase, GetMonthlyCostUseCase,
    GetNamespaceCostsUseCase, GetPodCostsUseCase,
};
pub use health::{CheckUpstreamHealthUseCase, HealthReport, HealthStatus};
pub use optimization::{
    GetEfficiencyUseCase, GetIdleCostsUseCase, GetOptimizationReportUseCase, GetSavingsUseCase,
};
