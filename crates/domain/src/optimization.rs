use crate::money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    Rightsizing,
    ReduceIdle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsRecommendation {
    pub id: String,
    pub kind: RecommendationKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub resource_name: String,
    pub namespace: Option<String>,
    #[serde(serialize_with = "money::serialize")]
    pub current_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub projected_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub savings: Decimal,
    pub savings_percentage: f64,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SavingsSummary {
    pub total_recommendations: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsReport {
    #[serde(serialize_with = "money::serialize")]
    pub total_potential_savings: Decimal,
    pub savings_percentage: f64,
    #[serde(serialize_with = "money::serialize")]
    pub cluster_total_cost: Decimal,
    pub currency: String,
    pub recommendations: Vec<SavingsRecommendation>,
    pub summary: SavingsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyReport {
    pub overall_score: f64,
    pub cpu_efficiency: f64,
    pub memory_efficiency: f64,
    pub storage_efficiency: f64,
    pub idle_percentage: f64,
    #[serde(serialize_with = "money::serialize")]
    pub total_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub total_idle_cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cpu,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdleBreakdown {
    pub namespace: String,
    pub resource: ResourceKind,
    #[serde(serialize_with = "money::serialize")]
    pub used: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub idle: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdleCostReport {
    #[serde(serialize_with = "money::serialize")]
    pub total_idle_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub total_cost: Decimal,
    pub idle_percentage: f64,
    pub breakdown: Vec<IdleBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Idle,
    Rightsizing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationSuggestion {
    pub title: String,
    pub description: String,
    pub category: SuggestionCategory,
    #[serde(serialize_with = "money::serialize")]
    pub estimated_savings: Decimal,
    pub priority: Severity,
    pub affected_resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationReport {
    pub cluster_name: String,
    pub total_suggestions: usize,
    #[serde(serialize_with = "money::serialize")]
    pub estimated_total_savings: Decimal,
    pub suggestions: Vec<OptimizationSuggestion>,
    pub generated_at: DateTime<Utc>,
}
