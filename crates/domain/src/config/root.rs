use serde::{Deserialize, Serialize};

use super::analysis::{AnalysisConfig, SAVINGS_LIMIT_RANGE};
use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::opencost::OpenCostConfig;
use super::refresh::RefreshConfig;
use crate::window::CostWindow;

const LOCAL_CONFIG_PATH: &str = "kubecent.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/kubecent/config.toml";

/// Main configuration structure for Kubecent
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Upstream cost API connection and retry settings
    #[serde(default)]
    pub opencost: OpenCostConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Background refresh of hot cache keys
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Savings and optimization thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. kubecent.toml in current directory
    /// 3. /etc/kubecent/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(url) = overrides.opencost_url {
            self.opencost.url = url;
        }
        if let Some(ttl) = overrides.cache_ttl_secs {
            self.cache.ttl_secs = ttl;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.opencost.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "OpenCost URL cannot be empty".to_string(),
            ));
        }

        if self.opencost.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "OpenCost timeout must be greater than 0".to_string(),
            ));
        }

        if self.opencost.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "OpenCost max_attempts must be at least 1".to_string(),
            ));
        }

        if self.opencost.initial_backoff_ms > self.opencost.max_backoff_ms {
            return Err(ConfigError::Validation(format!(
                "initial_backoff_ms ({}) exceeds max_backoff_ms ({})",
                self.opencost.initial_backoff_ms, self.opencost.max_backoff_ms
            )));
        }

        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "Cache TTL must be greater than 0".to_string(),
            ));
        }

        if self.cache.cleanup_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Cache cleanup interval must be greater than 0".to_string(),
            ));
        }

        if self.refresh.enabled {
            if self.refresh.interval_secs == 0 || self.refresh.interval_secs >= self.cache.ttl_secs
            {
                return Err(ConfigError::Validation(format!(
                    "Refresh interval ({}s) must be between 1 and the cache TTL ({}s) exclusive",
                    self.refresh.interval_secs, self.cache.ttl_secs
                )));
            }

            if self.refresh.windows.is_empty() {
                return Err(ConfigError::Validation(
                    "Refresh is enabled but no windows are configured".to_string(),
                ));
            }

            for window in &self.refresh.windows {
                CostWindow::parse(window).map_err(|e| {
                    ConfigError::Validation(format!("Refresh window '{}': {}", window, e))
                })?;
            }
        }

        if self.analysis.idle_pod_threshold < 0.0 || self.analysis.high_cost_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "Analysis thresholds cannot be negative".to_string(),
            ));
        }

        if !SAVINGS_LIMIT_RANGE.contains(&self.analysis.savings_limit) {
            return Err(ConfigError::Validation(format!(
                "savings_limit ({}) must be between {} and {}",
                self.analysis.savings_limit,
                SAVINGS_LIMIT_RANGE.start(),
                SAVINGS_LIMIT_RANGE.end()
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub opencost_url: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub log_level: Option<String>,
}
