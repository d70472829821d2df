use crate::money;
use crate::window::CostWindow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Canonical cost breakdown.
///
/// `total_cost` is the upstream total and may include spend that is not
/// broken out into the components (GPU, load balancers, ...). Do not assume
/// `total_cost == cpu + memory + storage + network`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CostAllocation {
    #[serde(serialize_with = "money::serialize")]
    pub cpu_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub memory_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub storage_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub network_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub total_cost: Decimal,
}

impl CostAllocation {
    pub fn merge(&self, other: &CostAllocation) -> CostAllocation {
        CostAllocation {
            cpu_cost: self.cpu_cost.saturating_add(other.cpu_cost),
            memory_cost: self.memory_cost.saturating_add(other.memory_cost),
            storage_cost: self.storage_cost.saturating_add(other.storage_cost),
            network_cost: self.network_cost.saturating_add(other.network_cost),
            total_cost: self.total_cost.saturating_add(other.total_cost),
        }
    }

    pub fn component_sum(&self) -> Decimal {
        self.cpu_cost
            .saturating_add(self.memory_cost)
            .saturating_add(self.storage_cost)
            .saturating_add(self.network_cost)
    }

    /// Every amount divided by `parts`, used to spread a window total over days.
    pub fn divide(&self, parts: u32) -> CostAllocation {
        let parts = Decimal::from(parts.max(1));
        CostAllocation {
            cpu_cost: self.cpu_cost / parts,
            memory_cost: self.memory_cost / parts,
            storage_cost: self.storage_cost / parts,
            network_cost: self.network_cost / parts,
            total_cost: self.total_cost / parts,
        }
    }
}

/// Allocated cost minus idle cost, never negative.
pub fn used_cost(allocated: Decimal, idle: Decimal) -> Decimal {
    allocated.saturating_sub(idle).max(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceCost {
    pub name: String,
    #[serde(flatten)]
    pub allocation: CostAllocation,
    #[serde(serialize_with = "money::serialize_opt")]
    pub idle_cost: Option<Decimal>,
    pub pod_count: Option<u64>,
}

impl NamespaceCost {
    pub fn idle(&self) -> Decimal {
        self.idle_cost.unwrap_or(Decimal::ZERO)
    }

    pub fn used_cost(&self) -> Decimal {
        used_cost(self.allocation.total_cost, self.idle())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodCost {
    pub name: String,
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub allocation: CostAllocation,
    #[serde(serialize_with = "money::serialize_opt")]
    pub idle_cost: Option<Decimal>,
}

impl PodCost {
    pub fn idle(&self) -> Decimal {
        self.idle_cost.unwrap_or(Decimal::ZERO)
    }

    pub fn used_cost(&self) -> Decimal {
        used_cost(self.allocation.total_cost, self.idle())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterCost {
    pub cluster_name: String,
    pub namespaces: usize,
    pub pods: u64,
    pub allocation: CostAllocation,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceCostReport {
    pub namespaces: Vec<NamespaceCost>,
    #[serde(serialize_with = "money::serialize")]
    pub total: Decimal,
    pub window: CostWindow,
    pub item_count: usize,
}

impl NamespaceCostReport {
    pub fn new(namespaces: Vec<NamespaceCost>, window: CostWindow) -> Self {
        let total = namespaces
            .iter()
            .fold(Decimal::ZERO, |acc, ns| acc.saturating_add(ns.allocation.total_cost));
        Self {
            item_count: namespaces.len(),
            namespaces,
            total,
            window,
        }
    }

    pub fn total_idle(&self) -> Decimal {
        self.namespaces
            .iter()
            .fold(Decimal::ZERO, |acc, ns| acc.saturating_add(ns.idle()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodCostReport {
    pub pods: Vec<PodCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(serialize_with = "money::serialize")]
    pub total: Decimal,
    pub window: CostWindow,
    pub item_count: usize,
}

impl PodCostReport {
    pub fn new(pods: Vec<PodCost>, namespace: Option<String>, window: CostWindow) -> Self {
        let total = pods
            .iter()
            .fold(Decimal::ZERO, |acc, pod| acc.saturating_add(pod.allocation.total_cost));
        Self {
            item_count: pods.len(),
            pods,
            namespace,
            total,
            window,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCost {
    /// Calendar month as `YYYY-MM`.
    pub month: String,
    #[serde(serialize_with = "money::serialize")]
    pub total_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub daily_average: Decimal,
    pub namespaces: usize,
    pub pods: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCostReport {
    pub months: Vec<MonthlyCost>,
    #[serde(serialize_with = "money::serialize")]
    pub total: Decimal,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostHistoryPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub allocation: CostAllocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostHistory {
    pub window: CostWindow,
    pub points: Vec<CostHistoryPoint>,
    #[serde(serialize_with = "money::serialize")]
    pub min: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub max: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub avg: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub total: Decimal,
}
