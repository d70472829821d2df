pub mod analysis;
pub mod cache;
pub mod errors;
pub mod logging;
pub mod opencost;
pub mod refresh;
pub mod root;

pub use analysis::AnalysisConfig;
pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use opencost::OpenCostConfig;
pub use refresh::RefreshConfig;
pub use root::{CliOverrides, Config};
