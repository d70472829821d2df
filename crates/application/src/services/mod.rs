pub mod analyzer;
pub mod cache_manager;
pub mod cost_snapshot;
pub mod normalizer;

pub use cache_manager::{CacheEntry, CacheManager, CacheStats, DEFAULT_TTL};
pub use cost_snapshot::{CostCache, CostSnapshot};
