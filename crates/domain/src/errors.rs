use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Upstream cost API failure [{code}]: {message}")]
    UpstreamFailure { message: String, code: String },

    #[error("Upstream cost API timed out after {timeout_secs}s")]
    UpstreamTimeout { timeout_secs: u64 },

    #[error("Upstream cost API rejected the request with HTTP {status}: {message}")]
    UpstreamRejected { status: u16, message: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("Invalid aggregate level: {0}")]
    InvalidAggregateLevel(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn upstream(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            message: message.into(),
            code: code.into(),
        }
    }

    /// Stable machine-readable code for callers that render errors.
    pub fn code(&self) -> &str {
        match self {
            Self::UpstreamFailure { code, .. } => code,
            Self::UpstreamTimeout { .. } => "OPENCOST_TIMEOUT",
            Self::UpstreamRejected { .. } => "OPENCOST_REJECTED",
            Self::MalformedResponse(_) => "OPENCOST_MALFORMED_RESPONSE",
            Self::InvalidWindow(_) => "INVALID_WINDOW",
            Self::InvalidAggregateLevel(_) => "INVALID_AGGREGATE_LEVEL",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ConfigError(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the failure comes from the upstream cost API rather than
    /// from the caller or from a bug in this process.
    pub fn is_upstream_degraded(&self) -> bool {
        matches!(
            self,
            Self::UpstreamFailure { .. }
                | Self::UpstreamTimeout { .. }
                | Self::UpstreamRejected { .. }
                | Self::MalformedResponse(_)
        )
    }

    pub fn is_programming_error(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
