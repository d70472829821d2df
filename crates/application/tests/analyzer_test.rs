use chrono::Utc;
use kubecent_application::services::analyzer::{
    efficiency, idle_costs, namespace_savings, optimization_report, pod_savings, split_idle,
};
use kubecent_application::services::normalizer::normalize_namespaces;
use kubecent_domain::config::AnalysisConfig;
use kubecent_domain::{
    CostAllocation, CostWindow, Decimal, NamespaceCost, NamespaceCostReport, PodCost,
    PodCostReport, RecommendationKind, ResourceKind, Severity, SuggestionCategory,
};
use serde_json::json;
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn namespace(name: &str, cpu: &str, memory: &str, total: &str, idle: Option<&str>) -> NamespaceCost {
    NamespaceCost {
        name: name.to_string(),
        allocation: CostAllocation {
            cpu_cost: dec(cpu),
            memory_cost: dec(memory),
            total_cost: dec(total),
            ..Default::default()
        },
        idle_cost: idle.map(dec),
        pod_count: None,
    }
}

fn pod(namespace: &str, name: &str, total: &str, idle: Option<&str>) -> PodCost {
    PodCost {
        name: name.to_string(),
        namespace: Some(namespace.to_string()),
        allocation: CostAllocation {
            total_cost: dec(total),
            ..Default::default()
        },
        idle_cost: idle.map(dec),
    }
}

fn namespace_report(namespaces: Vec<NamespaceCost>) -> NamespaceCostReport {
    NamespaceCostReport::new(namespaces, CostWindow::parse("7d").unwrap())
}

fn pod_report(pods: Vec<PodCost>) -> PodCostReport {
    PodCostReport::new(pods, None, CostWindow::parse("7d").unwrap())
}

#[test]
fn test_namespace_savings_severity_and_ordering() {
    let report = namespace_report(vec![
        namespace("low", "5", "5", "100", Some("10")),
        namespace("high", "5", "5", "100", Some("50")),
        namespace("medium", "5", "5", "100", Some("30")),
        namespace("busy", "5", "5", "100", None),
    ]);

    let savings = namespace_savings(&report, 10);

    assert_eq!(savings.recommendations.len(), 3);
    assert_eq!(savings.recommendations[0].resource_name, "high");
    assert_eq!(savings.recommendations[0].severity, Severity::High);
    assert_eq!(savings.recommendations[0].savings, dec("35"));
    assert_eq!(savings.recommendations[0].projected_cost, dec("65"));
    assert_eq!(savings.recommendations[0].savings_percentage, 35.0);
    assert_eq!(savings.recommendations[0].kind, RecommendationKind::Rightsizing);
    assert_eq!(savings.recommendations[1].severity, Severity::Medium);
    assert_eq!(savings.recommendations[2].severity, Severity::Low);

    assert_eq!(savings.total_potential_savings, dec("63"));
    assert_eq!(savings.cluster_total_cost, dec("400"));
    assert_eq!(savings.savings_percentage, 15.8);
    assert_eq!(savings.summary.total_recommendations, 3);
    assert_eq!(savings.summary.high_priority, 1);
    assert_eq!(savings.currency, "USD");
}

#[test]
fn test_savings_limit_truncates_but_summary_counts_all() {
    let report = namespace_report(vec![
        namespace("a", "1", "1", "10", Some("1")),
        namespace("b", "1", "1", "10", Some("2")),
        namespace("c", "1", "1", "10", Some("3")),
    ]);

    let savings = namespace_savings(&report, 2);

    assert_eq!(savings.recommendations.len(), 2);
    assert_eq!(savings.summary.total_recommendations, 3);
    assert_eq!(savings.total_potential_savings, dec("4.2"));
}

#[test]
fn test_pod_savings_only_flags_pods_over_twenty_percent_idle() {
    let report = pod_report(vec![
        pod("web", "web-1", "100", Some("20")),
        pod("web", "web-2", "100", Some("60")),
        pod("web", "web-3", "10", Some("5")),
    ]);

    let savings = pod_savings(&report, 10);

    assert_eq!(savings.recommendations.len(), 2);
    assert_eq!(savings.recommendations[0].resource_name, "web-2");
    assert_eq!(savings.recommendations[0].savings, dec("30"));
    assert_eq!(savings.recommendations[0].severity, Severity::High);
    assert_eq!(savings.recommendations[1].severity, Severity::Medium);
    assert_eq!(savings.recommendations[1].kind, RecommendationKind::ReduceIdle);
}

#[test]
fn test_split_idle_follows_cpu_memory_shares() {
    let (cpu, memory) = split_idle(&namespace("a", "30", "10", "40", Some("8")));
    assert_eq!(cpu, dec("6"));
    assert_eq!(memory, dec("2"));

    let (cpu, memory) = split_idle(&namespace("b", "0", "0", "10", Some("4")));
    assert_eq!(cpu, dec("2"));
    assert_eq!(memory, dec("2"));
}

#[test]
fn test_efficiency_scores() {
    let report = namespace_report(vec![
        namespace("a", "30", "10", "50", Some("10")),
        namespace("b", "10", "10", "50", None),
    ]);

    let eff = efficiency(&report);

    assert_eq!(eff.overall_score, 90.0);
    assert_eq!(eff.idle_percentage, 10.0);
    assert_eq!(eff.storage_efficiency, 90.0);
    // cpu idle 7.5 of 40, memory idle 2.5 of 20
    assert_eq!(eff.cpu_efficiency, 81.3);
    assert_eq!(eff.memory_efficiency, 87.5);
    assert_eq!(eff.total_idle_cost, dec("10"));
}

#[test]
fn test_efficiency_with_huge_idle_on_tiny_cpu_cost_scores_zero() {
    let huge = "10000000000000000000000";
    let report = namespace_report(vec![namespace("a", "0.0000001", "0", huge, Some(huge))]);

    let (cpu_idle, memory_idle) = split_idle(&report.namespaces[0]);
    assert_eq!(cpu_idle, dec(huge));
    assert_eq!(memory_idle, Decimal::ZERO);

    let eff = efficiency(&report);
    assert_eq!(eff.overall_score, 0.0);
    assert_eq!(eff.cpu_efficiency, 0.0);
    assert_eq!(eff.memory_efficiency, 0.0);
    assert_eq!(eff.idle_percentage, 100.0);
}

#[test]
fn test_extreme_upstream_amounts_flow_through_every_rule() {
    let raw = json!({
        "data": [{
            "properties": { "namespace": "a" },
            "cpuCost": 1e20,
            "totalCost": 1e20,
            "idleCost": 1e20
        }]
    });
    let report = namespace_report(normalize_namespaces(&raw));
    assert_eq!(report.namespaces.len(), 1);

    let eff = efficiency(&report);
    assert_eq!(eff.cpu_efficiency, 0.0);
    assert_eq!(eff.overall_score, 0.0);

    let idle = idle_costs(&report);
    assert_eq!(idle.idle_percentage, 100.0);

    let savings = namespace_savings(&report, 10);
    assert_eq!(savings.recommendations.len(), 1);
    assert_eq!(savings.recommendations[0].severity, Severity::High);

    let optimization = optimization_report(
        &AnalysisConfig::default(),
        &pod_report(Vec::new()),
        &report,
        Utc::now(),
    );
    assert_eq!(optimization.total_suggestions, 1);
    assert_eq!(optimization.estimated_total_savings, dec("10000000000000000000"));
}

#[test]
fn test_efficiency_of_empty_cluster_is_full() {
    let eff = efficiency(&namespace_report(Vec::new()));

    assert_eq!(eff.overall_score, 100.0);
    assert_eq!(eff.idle_percentage, 0.0);
}

#[test]
fn test_idle_breakdown_per_namespace_and_resource() {
    let report = namespace_report(vec![
        namespace("a", "30", "10", "50", Some("8")),
        namespace("b", "10", "10", "50", None),
    ]);

    let idle = idle_costs(&report);

    assert_eq!(idle.breakdown.len(), 2);
    assert_eq!(idle.breakdown[0].resource, ResourceKind::Cpu);
    assert_eq!(idle.breakdown[0].idle, dec("6"));
    assert_eq!(idle.breakdown[0].used, dec("24"));
    assert_eq!(idle.breakdown[1].resource, ResourceKind::Memory);
    assert_eq!(idle.breakdown[1].used, dec("8"));
    assert_eq!(idle.total_idle_cost, dec("8"));
    assert_eq!(idle.idle_percentage, 8.0);
}

#[test]
fn test_optimization_report_rules() {
    let config = AnalysisConfig::default();
    let pods = pod_report(vec![
        pod("web", "tiny", "0.005", None),
        pod("web", "normal", "5", None),
    ]);
    let namespaces = namespace_report(vec![
        namespace("big", "600", "600", "1500", None),
        namespace("small", "1", "1", "2", None),
    ]);

    let report = optimization_report(&config, &pods, &namespaces, Utc::now());

    assert_eq!(report.cluster_name, "kubecent-cluster");
    assert_eq!(report.total_suggestions, 2);
    assert_eq!(report.suggestions[0].category, SuggestionCategory::Idle);
    assert_eq!(report.suggestions[0].estimated_savings, dec("0.15"));
    assert_eq!(report.suggestions[0].affected_resources, vec!["tiny".to_string()]);
    assert_eq!(report.suggestions[1].category, SuggestionCategory::Rightsizing);
    assert_eq!(report.suggestions[1].priority, Severity::Medium);
    assert_eq!(report.suggestions[1].estimated_savings, dec("150"));
    assert_eq!(report.estimated_total_savings, dec("150.15"));
}
