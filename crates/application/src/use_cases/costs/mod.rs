pub mod get_cluster_cost;
pub mod get_cost_history;
pub mod get_monthly_cost;
pub mod get_namespace_costs;
pub mod get_pod_costs;

pub use get_cluster_cost::GetClusterCostUseCase;
pub use get_cost_history::GetCostHistoryUseCase;
pub use get_monthly_cost::GetMonthlyCostUseCase;
pub use get_namespace_costs::GetNamespaceCostsUseCase;
pub use get_pod_costs::GetPodCostsUseCase;
