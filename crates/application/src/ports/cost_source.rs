use async_trait::async_trait;
use kubecent_domain::{AggregateLevel, CostWindow, DomainError};

/// Upstream allocation payload, passed through untouched.
pub type RawAllocation = serde_json::Value;

/// Port for the upstream cost-reporting API.
///
/// Implementations own retries and timeouts. Every failure they return is
/// already a typed [`DomainError`]; transport errors never leak through.
#[async_trait]
pub trait CostSource: Send + Sync {
    async fn get_allocation(
        &self,
        level: AggregateLevel,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<RawAllocation, DomainError>;

    /// Single unretried probe. Never fails; an unreachable upstream is `false`.
    async fn health_check(&self) -> bool;
}
