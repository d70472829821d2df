//! Maps raw allocation payloads into the canonical cost model.
//!
//! Every function here is pure. Upstream records are untrusted: any field may
//! be missing, `null`, a number or a numeric string. A record whose amounts
//! cannot be read at all is skipped with a warning; the rest of the batch is
//! still normalized.

use chrono::{DateTime, Days, NaiveDate, Utc};
use kubecent_domain::{
    ClusterCost, CostAllocation, CostHistory, CostHistoryPoint, CostWindow, Decimal,
    NamespaceCost, PodCost,
};
use rustc_hash::FxHashMap;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::warn;

type Record = Map<String, Value>;

const CPU_FIELDS: &[&str] = &["cpuCost"];
const MEMORY_FIELDS: &[&str] = &["memoryAllocatableCost", "ramCost", "memoryCost"];
const STORAGE_FIELDS: &[&str] = &["storageAllocatableCost", "pvCost", "storageCost"];
const NETWORK_FIELDS: &[&str] = &["networkCost"];
const TOTAL_FIELDS: &[&str] = &["totalCost"];
const IDLE_FIELDS: &[&str] = &["idleCost"];

/// Parse one amount leniently. Absent and `null` read as zero.
///
/// Returns `None` when the value is present but not numeric.
pub fn parse_amount(value: Option<&Value>) -> Option<Decimal> {
    let amount = match value {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(Value::Number(n)) => {
            parse_decimal(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64))?
        }
        Some(Value::String(s)) => parse_decimal(s.trim())?,
        Some(_) => return None,
    };
    Some(amount.max(Decimal::ZERO))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

fn first_field<'a>(record: &'a Record, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| record.get(*field))
        .find(|value| !value.is_null())
}

fn amount_of(record: &Record, fields: &[&'static str]) -> Result<Decimal, &'static str> {
    parse_amount(first_field(record, fields)).ok_or(fields[0])
}

/// Canonical allocation plus optional idle cost for one raw record.
///
/// `Err` names the first field that held a non-numeric value.
pub fn normalize_allocation(
    record: &Record,
) -> Result<(CostAllocation, Option<Decimal>), &'static str> {
    let allocation = CostAllocation {
        cpu_cost: amount_of(record, CPU_FIELDS)?,
        memory_cost: amount_of(record, MEMORY_FIELDS)?,
        storage_cost: amount_of(record, STORAGE_FIELDS)?,
        network_cost: amount_of(record, NETWORK_FIELDS)?,
        total_cost: amount_of(record, TOTAL_FIELDS)?,
    };

    let idle = match first_field(record, IDLE_FIELDS) {
        None => None,
        Some(value) => {
            let idle = parse_amount(Some(value)).ok_or(IDLE_FIELDS[0])?;
            Some(idle.min(allocation.total_cost))
        }
    };

    Ok((allocation, idle))
}

/// Flatten the `data` member of an allocation payload into records.
///
/// Accepts a plain record list as well as the step-map layout
/// (`data: [{"<name>": record, ...}, ...]`) the allocation API returns.
pub fn allocation_records(raw: &Value) -> Vec<&Record> {
    let mut records = Vec::new();
    match raw.get("data") {
        Some(Value::Array(items)) => {
            for item in items {
                collect_records(item, &mut records);
            }
        }
        Some(Value::Object(step)) => collect_step(step, &mut records),
        Some(Value::Null) | None => {}
        Some(other) => {
            warn!(kind = json_kind(other), "Allocation payload has unusable data member");
        }
    }
    records
}

fn collect_records<'a>(item: &'a Value, out: &mut Vec<&'a Record>) {
    match item {
        Value::Object(map) if is_record(map) => out.push(map),
        Value::Object(step) => collect_step(step, out),
        other => warn!(kind = json_kind(other), "Skipping non-object allocation entry"),
    }
}

fn collect_step<'a>(step: &'a Record, out: &mut Vec<&'a Record>) {
    for (name, value) in step {
        match value {
            Value::Object(map) => out.push(map),
            other => warn!(
                name = %name,
                kind = json_kind(other),
                "Skipping non-object allocation entry"
            ),
        }
    }
}

fn is_record(map: &Record) -> bool {
    map.contains_key("properties")
        || map.contains_key("totalCost")
        || map.contains_key("cpuCost")
        || matches!(map.get("name"), Some(Value::String(_)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn property<'a>(record: &'a Record, name: &str) -> Option<&'a str> {
    record
        .get("properties")
        .and_then(|props| props.get(name))
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn pod_count(record: &Record) -> Option<u64> {
    if let Some(count) = record.get("podCount").and_then(Value::as_u64) {
        return Some(count);
    }
    match record.get("properties").and_then(|props| props.get("pods")) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::Array(pods)) => Some(pods.len() as u64),
        _ => None,
    }
}

fn merge_idle(left: Option<Decimal>, right: Option<Decimal>) -> Option<Decimal> {
    match (left, right) {
        (None, None) => None,
        (l, r) => Some(
            l.unwrap_or(Decimal::ZERO)
                .saturating_add(r.unwrap_or(Decimal::ZERO)),
        ),
    }
}

/// Namespace costs in first-seen order. Records without
/// `properties.namespace` are skipped; repeated namespaces are merged.
pub fn normalize_namespaces(raw: &Value) -> Vec<NamespaceCost> {
    let mut namespaces: Vec<NamespaceCost> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for record in allocation_records(raw) {
        let Some(name) = property(record, "namespace") else {
            continue;
        };
        let (allocation, idle_cost) = match normalize_allocation(record) {
            Ok(parsed) => parsed,
            Err(field) => {
                warn!(namespace = %name, field, "Skipping allocation record with non-numeric amount");
                continue;
            }
        };
        let pods = pod_count(record);

        match index.get(name) {
            Some(&pos) => {
                let existing = &mut namespaces[pos];
                existing.allocation = existing.allocation.merge(&allocation);
                existing.idle_cost = merge_idle(existing.idle_cost, idle_cost);
                existing.pod_count = existing.pod_count.max(pods);
            }
            None => {
                index.insert(name.to_string(), namespaces.len());
                namespaces.push(NamespaceCost {
                    name: name.to_string(),
                    allocation,
                    idle_cost,
                    pod_count: pods,
                });
            }
        }
    }

    namespaces
}

/// Pod costs in first-seen order. Records without `properties.pod` are
/// skipped. The namespace filter is applied after normalization.
pub fn normalize_pods(raw: &Value, namespace: Option<&str>) -> Vec<PodCost> {
    let mut pods: Vec<PodCost> = Vec::new();
    let mut index: FxHashMap<(Option<String>, String), usize> = FxHashMap::default();

    for record in allocation_records(raw) {
        let Some(name) = property(record, "pod") else {
            continue;
        };
        let pod_namespace = property(record, "namespace");
        let (allocation, idle_cost) = match normalize_allocation(record) {
            Ok(parsed) => parsed,
            Err(field) => {
                warn!(pod = %name, field, "Skipping allocation record with non-numeric amount");
                continue;
            }
        };

        let identity = (pod_namespace.map(str::to_string), name.to_string());
        match index.get(&identity) {
            Some(&pos) => {
                let existing = &mut pods[pos];
                existing.allocation = existing.allocation.merge(&allocation);
                existing.idle_cost = merge_idle(existing.idle_cost, idle_cost);
            }
            None => {
                index.insert(identity, pods.len());
                pods.push(PodCost {
                    name: name.to_string(),
                    namespace: pod_namespace.map(str::to_string),
                    allocation,
                    idle_cost,
                });
            }
        }
    }

    match namespace {
        Some(filter) => pods
            .into_iter()
            .filter(|pod| pod.namespace.as_deref() == Some(filter))
            .collect(),
        None => pods,
    }
}

/// Cluster summary from namespace costs: summed allocation and pod count.
pub fn summarize_cluster(
    cluster_name: &str,
    namespaces: &[NamespaceCost],
    timestamp: DateTime<Utc>,
) -> ClusterCost {
    let allocation = namespaces
        .iter()
        .fold(CostAllocation::default(), |acc, ns| acc.merge(&ns.allocation));
    let pods = namespaces
        .iter()
        .map(|ns| ns.pod_count.unwrap_or(0))
        .fold(0u64, u64::saturating_add);

    ClusterCost {
        cluster_name: cluster_name.to_string(),
        namespaces: namespaces.len(),
        pods,
        allocation,
        timestamp,
    }
}

/// Per-day history ending on `end_date`, with the window's allocation spread
/// evenly over its days. Days before the earliest representable date are
/// dropped.
pub fn spread_history(
    window: &CostWindow,
    allocation: &CostAllocation,
    end_date: NaiveDate,
) -> CostHistory {
    let days = window.days().max(1);
    let daily = allocation.divide(days);

    let points: Vec<CostHistoryPoint> = (0..days)
        .rev()
        .filter_map(|offset| end_date.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| CostHistoryPoint {
            date,
            allocation: daily.clone(),
        })
        .collect();

    let totals = points.iter().map(|p| p.allocation.total_cost);
    let min = totals.clone().min().unwrap_or(Decimal::ZERO);
    let max = totals.max().unwrap_or(Decimal::ZERO);
    // Divided points do not sum back exactly; keep the window total.
    let total = allocation.total_cost;
    let avg = total / Decimal::from(days);

    CostHistory {
        window: window.clone(),
        points,
        min,
        max,
        avg,
        total,
    }
}
