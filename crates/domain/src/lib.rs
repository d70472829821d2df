//! Kubecent Domain Layer
pub mod aggregate;
pub mod config;
pub mod cost;
pub mod cost_query;
pub mod errors;
pub mod money;
pub mod optimization;
pub mod window;

pub use aggregate::AggregateLevel;
pub use config::{CliOverrides, Config, ConfigError};
pub use cost::{
    ClusterCost, CostAllocation, CostHistory, CostHistoryPoint, MonthlyCost, MonthlyCostReport,
    NamespaceCost, NamespaceCostReport, PodCost, PodCostReport,
};
pub use cost_query::CostQuery;
pub use errors::DomainError;
pub use optimization::{
    EfficiencyReport, IdleBreakdown, IdleCostReport, OptimizationReport, OptimizationSuggestion,
    RecommendationKind, ResourceKind, SavingsRecommendation, SavingsReport, SavingsSummary,
    Severity, SuggestionCategory,
};
pub use rust_decimal::Decimal;
pub use window::CostWindow;
