#![allow(dead_code)]

use async_trait::async_trait;
use kubecent_application::ports::{CostSource, RawAllocation};
use kubecent_domain::{AggregateLevel, CostWindow, DomainError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockCostSource {
    responses: Arc<RwLock<HashMap<AggregateLevel, RawAllocation>>>,
    failure: Arc<RwLock<Option<DomainError>>>,
    healthy: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Option<Duration>>>,
    level_delays: Arc<RwLock<HashMap<AggregateLevel, Duration>>>,
    requested_windows: Arc<std::sync::Mutex<Vec<String>>>,
    call_count: Arc<AtomicU64>,
}

impl MockCostSource {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            failure: Arc::new(RwLock::new(None)),
            healthy: Arc::new(RwLock::new(true)),
            delay: Arc::new(RwLock::new(None)),
            level_delays: Arc::new(RwLock::new(HashMap::new())),
            requested_windows: Arc::new(std::sync::Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn set_response(&self, level: AggregateLevel, payload: Value) {
        self.responses.write().await.insert(level, payload);
    }

    pub async fn set_failure(&self, error: Option<DomainError>) {
        *self.failure.write().await = error;
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        let error = should_fail.then(|| {
            DomainError::upstream("connection refused", "OPENCOST_ALLOCATION_ERROR")
        });
        self.set_failure(error).await;
    }

    pub async fn set_healthy(&self, healthy: bool) {
        *self.healthy.write().await = healthy;
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn set_level_delay(&self, level: AggregateLevel, delay: Duration) {
        self.level_delays.write().await.insert(level, delay);
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requested_windows(&self) -> Vec<String> {
        self.requested_windows.lock().unwrap().clone()
    }
}

impl Default for MockCostSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CostSource for MockCostSource {
    async fn get_allocation(
        &self,
        level: AggregateLevel,
        window: &CostWindow,
        _include_idle: bool,
    ) -> Result<RawAllocation, DomainError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requested_windows
            .lock()
            .unwrap()
            .push(window.as_str().to_string());

        let level_delay = self.level_delays.read().await.get(&level).copied();
        let delay = level_delay.or(*self.delay.read().await);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failure.read().await.clone() {
            return Err(error);
        }

        Ok(self
            .responses
            .read()
            .await
            .get(&level)
            .cloned()
            .unwrap_or_else(|| json!({ "code": 200, "data": [] })))
    }

    async fn health_check(&self) -> bool {
        *self.healthy.read().await
    }
}

pub fn namespace_record(name: &str, cpu: f64, memory: f64, total: f64, idle: Option<f64>) -> Value {
    let mut record = json!({
        "name": name,
        "properties": { "namespace": name },
        "cpuCost": cpu,
        "memoryAllocatableCost": memory,
        "totalCost": total,
        "podCount": 2,
    });
    if let Some(idle) = idle {
        record["idleCost"] = json!(idle);
    }
    record
}

pub fn pod_record(namespace: &str, pod: &str, total: f64, idle: Option<f64>) -> Value {
    let mut record = json!({
        "name": pod,
        "properties": { "namespace": namespace, "pod": pod },
        "cpuCost": total / 2.0,
        "memoryAllocatableCost": total / 2.0,
        "totalCost": total,
    });
    if let Some(idle) = idle {
        record["idleCost"] = json!(idle);
    }
    record
}

pub fn payload(records: Vec<Value>) -> Value {
    json!({ "code": 200, "data": records })
}
