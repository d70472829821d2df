//! Heuristic savings, efficiency and optimization rules over normalized costs.

use chrono::{DateTime, Utc};
use kubecent_domain::config::AnalysisConfig;
use kubecent_domain::cost::used_cost;
use kubecent_domain::money::{percentage, round_money, round_percent};
use kubecent_domain::{
    Decimal, EfficiencyReport, IdleBreakdown, IdleCostReport, NamespaceCost, NamespaceCostReport,
    OptimizationReport, OptimizationSuggestion, PodCostReport, RecommendationKind, ResourceKind,
    SavingsRecommendation, SavingsReport, SavingsSummary, Severity, SuggestionCategory,
};
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

pub const CURRENCY: &str = "USD";

const NAMESPACE_SAVINGS_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 1);
const POD_SAVINGS_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const POD_IDLE_RATIO: Decimal = Decimal::from_parts(2, 0, 0, false, 1);
const RIGHTSIZING_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
const HIGH_SEVERITY_IDLE_PCT: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
const MEDIUM_SEVERITY_IDLE_PCT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const HIGH_PRIORITY_POD_SAVINGS: Decimal = Decimal::TEN;
const IDLE_POD_MONTHLY_FACTOR: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

fn severity_for_idle(idle_pct: Decimal) -> Severity {
    if idle_pct > HIGH_SEVERITY_IDLE_PCT {
        Severity::High
    } else if idle_pct > MEDIUM_SEVERITY_IDLE_PCT {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn summarize(recommendations: &[SavingsRecommendation]) -> SavingsSummary {
    let count = |severity: Severity| {
        recommendations
            .iter()
            .filter(|rec| rec.severity == severity)
            .count()
    };
    SavingsSummary {
        total_recommendations: recommendations.len(),
        high_priority: count(Severity::High),
        medium_priority: count(Severity::Medium),
        low_priority: count(Severity::Low),
    }
}

fn build_savings_report(
    mut recommendations: Vec<SavingsRecommendation>,
    cluster_total: Decimal,
    limit: usize,
) -> SavingsReport {
    let total_savings = recommendations
        .iter()
        .fold(Decimal::ZERO, |acc, rec| acc.saturating_add(rec.savings));
    let summary = summarize(&recommendations);

    recommendations.sort_by(|a, b| b.savings.cmp(&a.savings));
    recommendations.truncate(limit);

    SavingsReport {
        total_potential_savings: total_savings,
        savings_percentage: round_percent(percentage(total_savings, cluster_total)),
        cluster_total_cost: cluster_total,
        currency: CURRENCY.to_string(),
        recommendations,
        summary,
    }
}

/// One rightsizing recommendation per namespace with idle cost: 70% of the
/// idle spend is assumed recoverable.
pub fn namespace_savings(report: &NamespaceCostReport, limit: usize) -> SavingsReport {
    let recommendations = report
        .namespaces
        .iter()
        .filter(|ns| ns.idle() > Decimal::ZERO)
        .map(|ns| {
            let total = ns.allocation.total_cost;
            let savings = ns.idle() * NAMESPACE_SAVINGS_RATE;
            let idle_pct = percentage(ns.idle(), total);
            SavingsRecommendation {
                id: format!("rec-{}", ns.name),
                kind: RecommendationKind::Rightsizing,
                severity: severity_for_idle(idle_pct),
                title: format!("Right-size resources in {}", ns.name),
                description: format!(
                    "Namespace has {}% idle resources",
                    round_percent(idle_pct)
                ),
                resource_name: ns.name.clone(),
                namespace: Some(ns.name.clone()),
                current_cost: total,
                projected_cost: used_cost(total, savings),
                savings,
                savings_percentage: round_percent(percentage(savings, total)),
                action: "Reduce resource requests to match actual usage".to_string(),
            }
        })
        .collect();

    build_savings_report(recommendations, report.total, limit)
}

/// Pods whose idle cost exceeds 20% of their total; half the idle spend is
/// assumed recoverable.
pub fn pod_savings(report: &PodCostReport, limit: usize) -> SavingsReport {
    let recommendations = report
        .pods
        .iter()
        .filter(|pod| pod.idle() > pod.allocation.total_cost * POD_IDLE_RATIO)
        .enumerate()
        .map(|(i, pod)| {
            let total = pod.allocation.total_cost;
            let savings = pod.idle() * POD_SAVINGS_RATE;
            let severity = if savings > HIGH_PRIORITY_POD_SAVINGS {
                Severity::High
            } else {
                Severity::Medium
            };
            SavingsRecommendation {
                id: format!("rec-{:03}", i + 1),
                kind: RecommendationKind::ReduceIdle,
                severity,
                title: format!("Reduce idle allocation of {}", pod.name),
                description: format!(
                    "Pod {} has {} in idle costs",
                    pod.name,
                    round_money(pod.idle())
                ),
                resource_name: pod.name.clone(),
                namespace: pod.namespace.clone(),
                current_cost: total,
                projected_cost: used_cost(total, savings),
                savings,
                savings_percentage: round_percent(percentage(savings, total)),
                action: "Review resource requests and right-size to actual usage".to_string(),
            }
        })
        .collect();

    build_savings_report(recommendations, report.total, limit)
}

/// Split a namespace's idle cost between CPU and memory in proportion to
/// their share of `cpu + memory`. Even split when both are zero.
pub fn split_idle(ns: &NamespaceCost) -> (Decimal, Decimal) {
    let idle = ns.idle();
    let cpu = ns.allocation.cpu_cost;
    let memory = ns.allocation.memory_cost;
    let base = cpu.saturating_add(memory);

    if base.is_zero() {
        let half = idle / Decimal::TWO;
        return (half, idle - half);
    }
    // cpu / base is at most one, so the product never exceeds idle.
    let cpu_idle = idle * (cpu / base);
    (cpu_idle, idle.saturating_sub(cpu_idle))
}

fn score(idle: Decimal, cost: Decimal) -> Decimal {
    Decimal::ONE_HUNDRED
        .saturating_sub(percentage(idle, cost))
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

pub fn efficiency(report: &NamespaceCostReport) -> EfficiencyReport {
    let total_cost = report.total;
    let total_idle = report.total_idle();

    let (mut cpu_cost, mut cpu_idle) = (Decimal::ZERO, Decimal::ZERO);
    let (mut memory_cost, mut memory_idle) = (Decimal::ZERO, Decimal::ZERO);
    for ns in &report.namespaces {
        let (cpu, memory) = split_idle(ns);
        cpu_cost = cpu_cost.saturating_add(ns.allocation.cpu_cost);
        memory_cost = memory_cost.saturating_add(ns.allocation.memory_cost);
        cpu_idle = cpu_idle.saturating_add(cpu);
        memory_idle = memory_idle.saturating_add(memory);
    }

    let overall = score(total_idle, total_cost);
    let resource_score = |idle: Decimal, cost: Decimal| {
        if cost.is_zero() {
            overall
        } else {
            score(idle, cost)
        }
    };

    EfficiencyReport {
        overall_score: round_percent(overall),
        cpu_efficiency: round_percent(resource_score(cpu_idle, cpu_cost)),
        memory_efficiency: round_percent(resource_score(memory_idle, memory_cost)),
        storage_efficiency: round_percent(overall),
        idle_percentage: round_percent(percentage(total_idle, total_cost)),
        total_cost,
        total_idle_cost: total_idle,
    }
}

pub fn idle_costs(report: &NamespaceCostReport) -> IdleCostReport {
    let mut breakdown = Vec::new();
    for ns in report.namespaces.iter().filter(|ns| ns.idle() > Decimal::ZERO) {
        let (cpu_idle, memory_idle) = split_idle(ns);
        breakdown.push(IdleBreakdown {
            namespace: ns.name.clone(),
            resource: ResourceKind::Cpu,
            used: used_cost(ns.allocation.cpu_cost, cpu_idle),
            idle: cpu_idle,
        });
        breakdown.push(IdleBreakdown {
            namespace: ns.name.clone(),
            resource: ResourceKind::Memory,
            used: used_cost(ns.allocation.memory_cost, memory_idle),
            idle: memory_idle,
        });
    }

    let total_idle = report.total_idle();
    IdleCostReport {
        total_idle_cost: total_idle,
        total_cost: report.total,
        idle_percentage: round_percent(percentage(total_idle, report.total)),
        breakdown,
    }
}

fn threshold(value: f64) -> Decimal {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .unwrap_or(Decimal::ZERO)
}

/// Idle-pod and high-cost-namespace suggestions.
pub fn optimization_report(
    config: &AnalysisConfig,
    pods: &PodCostReport,
    namespaces: &NamespaceCostReport,
    generated_at: DateTime<Utc>,
) -> OptimizationReport {
    let idle_threshold = threshold(config.idle_pod_threshold);
    let high_cost = threshold(config.high_cost_threshold);

    let idle_pods = pods
        .pods
        .iter()
        .filter(|pod| pod.allocation.total_cost < idle_threshold)
        .map(|pod| OptimizationSuggestion {
            title: format!("Idle pod detected: {}", pod.name),
            description: format!(
                "Pod {} in {} has minimal resource usage. Consider removing or consolidating.",
                pod.name,
                pod.namespace.as_deref().unwrap_or("unknown namespace")
            ),
            category: SuggestionCategory::Idle,
            estimated_savings: pod
                .allocation
                .total_cost
                .saturating_mul(IDLE_POD_MONTHLY_FACTOR),
            priority: Severity::Low,
            affected_resources: vec![pod.name.clone()],
        });

    let expensive_namespaces = namespaces
        .namespaces
        .iter()
        .filter(|ns| ns.allocation.total_cost > high_cost)
        .map(|ns| OptimizationSuggestion {
            title: format!("Review namespace resource allocation: {}", ns.name),
            description: format!(
                "Namespace {} has high cost ({}). Review pod requests and limits.",
                ns.name,
                round_money(ns.allocation.total_cost)
            ),
            category: SuggestionCategory::Rightsizing,
            estimated_savings: ns.allocation.total_cost * RIGHTSIZING_RATE,
            priority: Severity::Medium,
            affected_resources: vec![ns.name.clone()],
        });

    let suggestions: Vec<OptimizationSuggestion> = idle_pods.chain(expensive_namespaces).collect();
    let estimated_total_savings = suggestions
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.estimated_savings));

    OptimizationReport {
        cluster_name: config.cluster_name.clone(),
        total_suggestions: suggestions.len(),
        estimated_total_savings,
        suggestions,
        generated_at,
    }
}
