//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Detect success and retry sets that contradict each other
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::decode::DateStrategy;
use crate::http::status::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("defaults.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("defaults.success_codes must not be empty")]
    EmptySuccessCodes,

    #[error("defaults.success_codes contains non-HTTP category {0}")]
    NonHttpSuccessCode(StatusCode),

    #[error("{0} is both a success code and a retry condition")]
    RetryOverlapsSuccess(StatusCode),

    #[error("defaults.date_strategy format must not be empty")]
    EmptyDateFormat,
}

pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let defaults = &config.defaults;

    if defaults.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if defaults.success_codes.is_empty() {
        errors.push(ValidationError::EmptySuccessCodes);
    }
    for code in &defaults.success_codes {
        if code.raw().is_none() {
            errors.push(ValidationError::NonHttpSuccessCode(*code));
        }
    }

    if config.retries.max_attempts > 0 {
        for code in &config.retries.retry_on {
            if defaults.success_codes.contains(code) {
                errors.push(ValidationError::RetryOverlapsSuccess(*code));
            }
        }
    }

    if let Some(DateStrategy::Formatted(format)) = &defaults.date_strategy {
        if format.trim().is_empty() {
            errors.push(ValidationError::EmptyDateFormat);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ClientConfig::default();
        config.defaults.timeout_secs = 0;
        config.defaults.success_codes = vec![StatusCode::Ok, StatusCode::TimedOut];
        config.defaults.date_strategy = Some(DateStrategy::Formatted(" ".into()));
        config.retries.max_attempts = 1;
        config.retries.retry_on = vec![StatusCode::Ok];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroTimeout,
                ValidationError::NonHttpSuccessCode(StatusCode::TimedOut),
                ValidationError::RetryOverlapsSuccess(StatusCode::Ok),
                ValidationError::EmptyDateFormat,
            ]
        );
    }

    #[test]
    fn test_overlap_ignored_when_retries_disabled() {
        let mut config = ClientConfig::default();
        config.retries.max_attempts = 0;
        config.retries.retry_on = vec![StatusCode::Ok];
        assert!(validate_config(&config).is_ok());
    }
}
