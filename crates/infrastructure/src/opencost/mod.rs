pub mod client;
pub mod retry;

pub use client::OpenCostClient;
pub use retry::RetryPolicy;
