use kubecent_application::services::normalizer::{
    allocation_records, normalize_allocation, normalize_namespaces, normalize_pods, parse_amount,
    spread_history, summarize_cluster,
};
use chrono::{Days, NaiveDate, Utc};
use kubecent_domain::{CostAllocation, CostWindow, Decimal, NamespaceCostReport};
use serde_json::json;
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

#[test]
fn test_lenient_fields_string_absent_and_number() {
    let raw = json!({
        "data": [{
            "properties": { "namespace": "default" },
            "cpuCost": "10.5",
            "totalCost": 20
        }]
    });

    let namespaces = normalize_namespaces(&raw);

    assert_eq!(namespaces.len(), 1);
    let allocation = &namespaces[0].allocation;
    assert_eq!(allocation.cpu_cost, dec("10.5"));
    assert_eq!(allocation.memory_cost, Decimal::ZERO);
    assert_eq!(allocation.total_cost, dec("20"));
    assert_eq!(namespaces[0].idle_cost, None);
}

#[test]
fn test_decimal_total_rounds_reproducibly() {
    let raw = json!({
        "data": [
            { "properties": { "namespace": "a" }, "totalCost": 10.00 },
            { "properties": { "namespace": "b" }, "totalCost": 20.005 },
            { "properties": { "namespace": "c" }, "totalCost": 5.001 }
        ]
    });

    let window = CostWindow::parse("7d").unwrap();
    let report = NamespaceCostReport::new(normalize_namespaces(&raw), window);

    assert_eq!(report.total, dec("35.006"));
    let rendered = serde_json::to_value(&report).unwrap();
    assert_eq!(rendered["total"], json!(35.01));
}

#[test]
fn test_records_without_identity_are_skipped() {
    let raw = json!({
        "data": [
            { "name": "__idle__", "totalCost": 4.0 },
            { "properties": { "namespace": "" }, "totalCost": 1.0 },
            { "properties": { "namespace": "kube-system" }, "totalCost": 2.0 }
        ]
    });

    let namespaces = normalize_namespaces(&raw);

    assert_eq!(namespaces.len(), 1);
    assert_eq!(namespaces[0].name, "kube-system");
}

#[test]
fn test_malformed_record_is_skipped_without_aborting_batch() {
    let raw = json!({
        "data": [
            { "properties": { "namespace": "broken" }, "cpuCost": "n/a", "totalCost": 3 },
            { "properties": { "namespace": "also-broken" }, "totalCost": [1, 2] },
            { "properties": { "namespace": "ok" }, "cpuCost": 1.25, "totalCost": "2.5" }
        ]
    });

    let namespaces = normalize_namespaces(&raw);

    assert_eq!(namespaces.len(), 1);
    assert_eq!(namespaces[0].name, "ok");
    assert_eq!(namespaces[0].allocation.total_cost, dec("2.5"));
}

#[test]
fn test_null_and_negative_amounts() {
    assert_eq!(parse_amount(Some(&json!(null))), Some(Decimal::ZERO));
    assert_eq!(parse_amount(None), Some(Decimal::ZERO));
    assert_eq!(parse_amount(Some(&json!(-3.5))), Some(Decimal::ZERO));
    assert_eq!(parse_amount(Some(&json!(" 4.20 "))), Some(dec("4.20")));
    assert_eq!(parse_amount(Some(&json!(true))), None);
    assert_eq!(parse_amount(Some(&json!("abc"))), None);
}

#[test]
fn test_memory_and_storage_fallback_fields() {
    let record = json!({
        "ramCost": 3,
        "pvCost": "1.5",
        "networkCost": 0.25,
        "totalCost": 5
    });

    let (allocation, idle) = normalize_allocation(record.as_object().unwrap()).unwrap();

    assert_eq!(allocation.memory_cost, dec("3"));
    assert_eq!(allocation.storage_cost, dec("1.5"));
    assert_eq!(allocation.network_cost, dec("0.25"));
    assert_eq!(idle, None);
}

#[test]
fn test_idle_is_clamped_to_total_and_used_never_negative() {
    let raw = json!({
        "data": [{
            "properties": { "namespace": "batch" },
            "totalCost": 4,
            "idleCost": 6
        }]
    });

    let namespaces = normalize_namespaces(&raw);

    assert_eq!(namespaces[0].idle_cost, Some(dec("4")));
    assert_eq!(namespaces[0].used_cost(), Decimal::ZERO);
}

#[test]
fn test_total_is_not_assumed_additive() {
    let raw = json!({
        "data": [{
            "properties": { "namespace": "gpu" },
            "cpuCost": 1,
            "memoryAllocatableCost": 1,
            "totalCost": 10
        }]
    });

    let allocation = &normalize_namespaces(&raw)[0].allocation;

    assert_eq!(allocation.total_cost, dec("10"));
    assert_eq!(allocation.component_sum(), dec("2"));
}

#[test]
fn test_step_map_payload_is_flattened_and_merged() {
    let raw = json!({
        "code": 200,
        "data": [
            {
                "default": { "name": "default", "properties": { "namespace": "default" }, "totalCost": 1.10, "idleCost": 0.10, "podCount": 3 },
                "monitoring": { "name": "monitoring", "properties": { "namespace": "monitoring" }, "totalCost": 2.00 }
            },
            {
                "default": { "name": "default", "properties": { "namespace": "default" }, "totalCost": 0.90, "podCount": 4 }
            }
        ]
    });

    assert_eq!(allocation_records(&raw).len(), 3);

    let namespaces = normalize_namespaces(&raw);

    assert_eq!(namespaces.len(), 2);
    assert_eq!(namespaces[0].name, "default");
    assert_eq!(namespaces[0].allocation.total_cost, dec("2.00"));
    assert_eq!(namespaces[0].idle_cost, Some(dec("0.10")));
    assert_eq!(namespaces[0].pod_count, Some(4));
    assert_eq!(namespaces[1].name, "monitoring");
}

#[test]
fn test_missing_or_unusable_data_yields_empty() {
    assert!(normalize_namespaces(&json!({})).is_empty());
    assert!(normalize_namespaces(&json!({ "data": null })).is_empty());
    assert!(normalize_namespaces(&json!({ "data": "oops" })).is_empty());
    assert!(normalize_namespaces(&json!({ "data": [1, "x", null] })).is_empty());
}

#[test]
fn test_pod_filter_applies_after_normalization() {
    let raw = json!({
        "data": [
            { "properties": { "namespace": "web", "pod": "web-1" }, "totalCost": 1.5 },
            { "properties": { "namespace": "web", "pod": "web-2" }, "totalCost": 2.5 },
            { "properties": { "namespace": "db", "pod": "db-1" }, "totalCost": 10 },
            { "properties": { "namespace": "web" }, "totalCost": 99 }
        ]
    });

    let all = normalize_pods(&raw, None);
    let web = normalize_pods(&raw, Some("web"));

    assert_eq!(all.len(), 3);
    assert_eq!(web.len(), 2);
    assert!(web.iter().all(|pod| pod.namespace.as_deref() == Some("web")));
}

#[test]
fn test_pods_with_same_name_in_different_namespaces_stay_distinct() {
    let raw = json!({
        "data": [
            { "properties": { "namespace": "a", "pod": "worker" }, "totalCost": 1 },
            { "properties": { "namespace": "b", "pod": "worker" }, "totalCost": 2 }
        ]
    });

    assert_eq!(normalize_pods(&raw, None).len(), 2);
}

#[test]
fn test_summarize_cluster_sums_allocation_and_pods() {
    let raw = json!({
        "data": [
            { "properties": { "namespace": "a" }, "cpuCost": 1, "totalCost": 3, "podCount": 2 },
            { "properties": { "namespace": "b", "pods": ["x", "y", "z"] }, "cpuCost": 2, "totalCost": 4 }
        ]
    });

    let cluster = summarize_cluster("prod", &normalize_namespaces(&raw), Utc::now());

    assert_eq!(cluster.cluster_name, "prod");
    assert_eq!(cluster.namespaces, 2);
    assert_eq!(cluster.pods, 5);
    assert_eq!(cluster.allocation.cpu_cost, dec("3"));
    assert_eq!(cluster.allocation.total_cost, dec("7"));
}

#[test]
fn test_history_spreads_evenly_over_window_days() {
    let window = CostWindow::parse("7d").unwrap();
    let allocation = CostAllocation {
        total_cost: dec("70"),
        cpu_cost: dec("35"),
        ..Default::default()
    };
    let end = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

    let history = spread_history(&window, &allocation, end);

    assert_eq!(history.points.len(), 7);
    assert_eq!(
        history.points[0].date,
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    );
    assert_eq!(history.points[6].date, end);
    assert!(history
        .points
        .iter()
        .all(|p| p.allocation.total_cost == dec("10")));
    assert_eq!(history.min, dec("10"));
    assert_eq!(history.max, dec("10"));
    assert_eq!(history.avg, dec("10"));
    assert_eq!(history.total, dec("70"));
}

#[test]
fn test_history_of_longest_window_has_one_point_per_day() {
    let window = CostWindow::parse("3650d").unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

    let history = spread_history(&window, &CostAllocation::default(), end);

    assert_eq!(history.points.len(), 3650);
    assert_eq!(history.points[3649].date, end);
}

#[test]
fn test_history_drops_days_before_earliest_date() {
    let window = CostWindow::parse("7d").unwrap();
    let end = NaiveDate::MIN.checked_add_days(Days::new(2)).unwrap();
    let allocation = CostAllocation {
        total_cost: dec("7"),
        ..Default::default()
    };

    let history = spread_history(&window, &allocation, end);

    assert_eq!(history.points.len(), 3);
    assert_eq!(history.points[0].date, NaiveDate::MIN);
    assert_eq!(history.total, dec("7"));
}
