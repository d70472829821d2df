pub mod get_efficiency;
pub mod get_idle_costs;
pub mod get_report;
pub mod get_savings;

pub use get_efficiency::GetEfficiencyUseCase;
pub use get_idle_costs::GetIdleCostsUseCase;
pub use get_report::GetOptimizationReportUseCase;
pub use get_savings::GetSavingsUseCase;
