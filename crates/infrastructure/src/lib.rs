pub mod cache_maintenance;
pub mod opencost;
