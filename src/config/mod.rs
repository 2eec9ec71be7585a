//! Configuration management.

mod file_config;

pub use file_config::{default_config_path, load_config, ConfigError, ENV_PREFIX};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::RetryConfig;

/// Public OEIS endpoint
pub const DEFAULT_BASE_URL: &str = "https://oeis.org";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the catalog (`OEIS_BASE_URL`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (`OEIS_TIMEOUT_SECS`)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds (`OEIS_CONNECT_TIMEOUT_SECS`)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User agent sent with every request (`OEIS_USER_AGENT`)
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side request rate cap; unlimited when unset (`OEIS_REQUESTS_PER_SECOND`)
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Retry behaviour for transport failures
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
            requests_per_second: None,
            retry: RetrySettings::default(),
        }
    }
}

impl ClientConfig {
    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout
    ///
    /// Timeouts are kept in whole seconds; a fractional part rounds up.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = whole_secs(timeout);
        self
    }

    /// Set the connect timeout, in whole seconds rounded up
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_secs = whole_secs(timeout);
        self
    }

    /// Set the user agent sent with every request
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Cap the request rate
    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Set the retry behaviour
    pub fn retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Load from the default config file (if present) and `OEIS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = default_config_path().filter(|p| p.exists());
        file_config::build(path.as_deref(), config::Environment::with_prefix(ENV_PREFIX))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Check values that deserialization alone cannot rule out
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {}", self.base_url, e)))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url {:?} is not an http(s) URL",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be positive".to_string(),
            ));
        }
        if self.requests_per_second == Some(0) {
            return Err(ConfigError::Invalid(
                "requests_per_second must be positive".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "retry.backoff_multiplier must be a finite number >= 1, got {}",
                multiplier
            )));
        }
        Ok(())
    }
}

fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Retry settings as they appear in configuration
///
/// `max_attempts = 1` means every failure is returned immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetrySettings {
    /// Retry up to `max_attempts` times in total
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        RetryConfig {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            backoff_multiplier: settings.backoff_multiplier,
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://oeis.org");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.requests_per_second, None);
        assert_eq!(config.retry.max_attempts, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::default()
            .base_url("http://localhost:8080")
            .timeout(Duration::from_secs(5))
            .requests_per_second(3)
            .retry(RetrySettings::attempts(4));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.requests_per_second, Some(3));
        assert_eq!(RetryConfig::from(&config.retry).max_attempts, 4);
    }

    #[test]
    fn test_timeouts_round_up_to_whole_seconds() {
        let config = ClientConfig::default()
            .timeout(Duration::from_millis(200))
            .connect_timeout(Duration::from_millis(2_500))
            .user_agent("sequence-tool/0.2");

        assert_eq!(config.timeout_secs, 1);
        assert_eq!(config.connect_timeout_secs, 3);
        assert_eq!(config.connection_timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent.as_deref(), Some("sequence-tool/0.2"));
        assert!(config.validate().is_ok());

        let config = ClientConfig::default().connect_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_backoff() {
        for multiplier in [-2.0, 0.0, 0.5, f64::NAN, f64::INFINITY] {
            let retry = RetrySettings {
                backoff_multiplier: multiplier,
                ..RetrySettings::attempts(3)
            };
            assert!(
                matches!(
                    ClientConfig::default().retry(retry).validate(),
                    Err(ConfigError::Invalid(_))
                ),
                "{} should be rejected",
                multiplier
            );
        }

        let retry = RetrySettings {
            backoff_multiplier: 1.0,
            ..RetrySettings::attempts(3)
        };
        assert!(ClientConfig::default().retry(retry).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::default().base_url("not a url").validate().is_err());
        assert!(ClientConfig::default().base_url("ftp://oeis.org").validate().is_err());
        assert!(ClientConfig::default().requests_per_second(0).validate().is_err());
        assert!(ClientConfig::default()
            .retry(RetrySettings::attempts(0))
            .validate()
            .is_err());

        let mut config = ClientConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_settings_conversion() {
        let settings = RetrySettings {
            max_attempts: 3,
            initial_delay_ms: 250,
            max_delay_ms: 1_000,
            backoff_multiplier: 1.5,
        };
        let retry = RetryConfig::from(&settings);
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.initial_delay, Duration::from_millis(250));
        assert_eq!(retry.max_delay, Duration::from_secs(1));
    }
}
