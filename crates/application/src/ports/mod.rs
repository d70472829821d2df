mod cache_maintenance_port;
mod cost_source;

pub use cache_maintenance_port::{CacheCleanupOutcome, CacheMaintenancePort, CacheRefreshOutcome};
pub use cost_source::{CostSource, RawAllocation};
