use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted range for the number of savings recommendations returned.
pub const SAVINGS_LIMIT_RANGE: RangeInclusive<usize> = 1..=50;

/// Thresholds for the savings and optimization rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,

    /// Pods whose total cost is below this are reported as idle.
    #[serde(default = "default_idle_pod_threshold")]
    pub idle_pod_threshold: f64,

    /// Namespaces whose total cost is above this are flagged for rightsizing.
    #[serde(default = "default_high_cost_threshold")]
    pub high_cost_threshold: f64,

    #[serde(default = "default_savings_limit")]
    pub savings_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cluster_name: default_cluster_name(),
            idle_pod_threshold: default_idle_pod_threshold(),
            high_cost_threshold: default_high_cost_threshold(),
            savings_limit: default_savings_limit(),
        }
    }
}

fn default_cluster_name() -> String {
    "kubecent-cluster".to_string()
}

fn default_idle_pod_threshold() -> f64 {
    0.01
}

fn default_high_cost_threshold() -> f64 {
    1000.0
}

fn default_savings_limit() -> usize {
    10
}
