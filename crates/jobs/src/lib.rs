pub mod cache_cleanup;
pub mod cost_refresh;
pub mod runner;

pub use cache_cleanup::CacheCleanupJob;
pub use cost_refresh::{hot_queries, CostRefreshJob};
pub use runner::JobRunner;
