//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::decode::DateStrategy;
use crate::http::status::StatusCode;
use crate::resilience::RetryPolicy;

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Defaults applied to every request descriptor.
    pub defaults: RequestDefaults,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Per-request defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestDefaults {
    /// Transport deadline in seconds.
    pub timeout_secs: u64,

    /// Minimum perceived latency of a success, in milliseconds.
    pub additional_timeout_ms: u64,

    /// Statuses treated as success.
    pub success_codes: Vec<StatusCode>,

    /// Client-wide date strategy for structured bodies.
    pub date_strategy: Option<DateStrategy>,
}

impl RequestDefaults {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn additional_timeout(&self) -> Duration {
        Duration::from_millis(self.additional_timeout_ms)
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            additional_timeout_ms: 0,
            success_codes: vec![
                StatusCode::Ok,
                StatusCode::Created,
                StatusCode::Accepted,
                StatusCode::NoContent,
            ],
            date_strategy: None,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of restarts per logical request (0 disables retries).
    pub max_attempts: u32,

    /// Classifications that restart the request, as HTTP codes or names
    /// such as `"timed_out"`.
    pub retry_on: Vec<StatusCode>,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_on.iter().copied())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            retry_on: vec![StatusCode::TimedOut, StatusCode::RequestTimeout],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record resolution metrics through the `metrics` facade and install
    /// the success-counting observer.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.defaults.timeout(), Duration::from_secs(30));
        assert_eq!(config.defaults.success_codes.len(), 4);
        assert!(!config.retries.policy().is_enabled());
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_full_config() {
        let config: ClientConfig = toml::from_str(
            r#"
            [defaults]
            timeout_secs = 5
            additional_timeout_ms = 750
            success_codes = [200, "created"]
            date_strategy = { formatted = "%Y-%m-%d" }

            [retries]
            max_attempts = 2
            retry_on = ["timed_out", 503]

            [observability]
            log_level = "debug"
            metrics_enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults.additional_timeout(), Duration::from_millis(750));
        assert_eq!(config.defaults.success_codes, vec![StatusCode::Ok, StatusCode::Created]);
        assert_eq!(
            config.defaults.date_strategy,
            Some(DateStrategy::Formatted("%Y-%m-%d".to_string()))
        );
        let policy = config.retries.policy();
        assert_eq!(policy.max_attempts, 2);
        assert!(policy.retry_on.contains(&StatusCode::Other(503)));
        assert!(policy.retry_on.contains(&StatusCode::TimedOut));
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_unit_date_strategy() {
        let defaults: RequestDefaults = toml::from_str(r#"date_strategy = "seconds_since_1970""#).unwrap();
        assert_eq!(defaults.date_strategy, Some(DateStrategy::SecondsSince1970));
    }
}
