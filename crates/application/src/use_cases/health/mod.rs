pub mod check_upstream;

pub use check_upstream::{CheckUpstreamHealthUseCase, HealthReport, HealthStatus};
