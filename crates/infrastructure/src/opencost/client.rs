//! HTTP client for the OpenCost allocation API.
//!
//! ```text
//! GET {base}/allocation/compute?aggregate={level}&window={window}&idle={bool}
//! GET {base}/healthz
//! ```

use super::retry::RetryPolicy;
use async_trait::async_trait;
use kubecent_application::ports::{CostSource, RawAllocation};
use kubecent_domain::config::OpenCostConfig;
use kubecent_domain::{AggregateLevel, CostWindow, DomainError};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

pub const ALLOCATION_ERROR_CODE: &str = "OPENCOST_ALLOCATION_ERROR";

const ALLOCATION_PATH: &str = "/allocation/compute";
const HEALTH_PATH: &str = "/healthz";
const MAX_ERROR_BODY: usize = 256;

/// Failure of a single attempt, before retries are settled.
#[derive(Debug)]
enum AttemptError {
    Transient(String),
    Timeout,
    Rejected { status: u16, message: String },
    Malformed(String),
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        matches!(self, AttemptError::Transient(_) | AttemptError::Timeout)
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Transient(msg) => write!(f, "{}", msg),
            AttemptError::Timeout => f.write_str("request timed out"),
            AttemptError::Rejected { status, message } => {
                write!(f, "HTTP {}: {}", status, message)
            }
            AttemptError::Malformed(msg) => write!(f, "malformed body: {}", msg),
        }
    }
}

pub struct OpenCostClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl OpenCostClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| DomainError::ConfigError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            retry,
        })
    }

    pub fn from_config(config: &OpenCostConfig) -> Result<Self, DomainError> {
        Self::new(
            &config.url,
            config.timeout(),
            RetryPolicy::from_config(config),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_once(
        &self,
        level: AggregateLevel,
        window: &CostWindow,
        include_idle: bool,
        attempt: u32,
    ) -> Result<RawAllocation, AttemptError> {
        let url = format!("{}{}", self.base_url, ALLOCATION_PATH);
        debug!(
            url = %url,
            aggregate = level.as_str(),
            window = %window,
            include_idle,
            attempt,
            "Requesting allocation"
        );

        let request = self.http.get(&url).query(&[
            ("aggregate", level.as_str()),
            ("window", window.as_str()),
            ("idle", if include_idle { "true" } else { "false" }),
        ]);

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| AttemptError::Timeout)?
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = tokio::time::timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| AttemptError::Timeout)?
            .map_err(classify_transport_error)?;

        if status.is_server_error() {
            return Err(AttemptError::Transient(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }
        if !status.is_success() {
            return Err(AttemptError::Rejected {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        let payload: RawAllocation =
            serde_json::from_slice(&body).map_err(|e| AttemptError::Malformed(e.to_string()))?;
        if !payload.is_object() {
            return Err(AttemptError::Malformed(
                "expected a JSON object at the top level".to_string(),
            ));
        }

        debug!(url = %url, bytes = body.len(), "Allocation response received");
        Ok(payload)
    }

    fn settle(&self, error: AttemptError) -> DomainError {
        match error {
            AttemptError::Transient(msg) => DomainError::upstream(
                format!(
                    "allocation request failed after {} attempt(s): {}",
                    self.retry.max_attempts(),
                    msg
                ),
                ALLOCATION_ERROR_CODE,
            ),
            AttemptError::Timeout => DomainError::UpstreamTimeout {
                timeout_secs: self.timeout.as_secs().max(1),
            },
            AttemptError::Rejected { status, message } => {
                DomainError::UpstreamRejected { status, message }
            }
            AttemptError::Malformed(msg) => DomainError::MalformedResponse(msg),
        }
    }
}

fn classify_transport_error(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        AttemptError::Timeout
    } else {
        AttemptError::Transient(e.to_string())
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[async_trait]
impl CostSource for OpenCostClient {
    async fn get_allocation(
        &self,
        level: AggregateLevel,
        window: &CostWindow,
        include_idle: bool,
    ) -> Result<RawAllocation, DomainError> {
        self.retry
            .run(
                "opencost.allocation",
                |attempt| self.fetch_once(level, window, include_idle, attempt),
                AttemptError::is_retryable,
            )
            .await
            .map_err(|e| {
                warn!(
                    aggregate = level.as_str(),
                    window = %window,
                    error = %e,
                    "Allocation request failed"
                );
                self.settle(e)
            })
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        match tokio::time::timeout(self.timeout, self.http.get(&url).send()).await {
            Ok(Ok(response)) => {
                let healthy = response.status().is_success();
                if !healthy {
                    debug!(url = %url, status = response.status().as_u16(), "Health probe failed");
                }
                healthy
            }
            Ok(Err(e)) => {
                debug!(url = %url, error = %e, "Health probe failed");
                false
            }
            Err(_) => {
                debug!(url = %url, "Health probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenCostClient::new(
            "http://opencost:9003/",
            Duration::from_secs(30),
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://opencost:9003");
    }

    #[test]
    fn test_only_transport_failures_are_retryable() {
        assert!(AttemptError::Timeout.is_retryable());
        assert!(AttemptError::Transient("reset".into()).is_retryable());
        assert!(!AttemptError::Rejected {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!AttemptError::Malformed("eof".into()).is_retryable());
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(1000);
        assert_eq!(excerpt(body.as_bytes()).len(), MAX_ERROR_BODY + 3);
    }
}
