//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a classified outcome restarts the logical request
//! - Track attempts made for one logical request
//!
//! # Design Decisions
//! - One predicate for received responses and timed-out transports: the
//!   classification must be in the retryable set and attempts must remain
//! - The policy only evaluates; the resolver increments the counter when it
//!   acts on a positive decision
//! - Restarts are immediate; there is no backoff between attempts

use std::collections::HashSet;

use crate::http::status::StatusCode;

/// Retry policy of one request descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Maximum number of restarts per logical request.
    pub max_attempts: u32,

    /// Classifications that trigger a restart.
    pub retry_on: HashSet<StatusCode>,
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(max_attempts: u32, retry_on: impl IntoIterator<Item = StatusCode>) -> Self {
        Self {
            max_attempts,
            retry_on: retry_on.into_iter().map(StatusCode::canonical).collect(),
        }
    }

    /// Retry on `TimedOut` and `RequestTimeout` only.
    pub fn on_timeout(max_attempts: u32) -> Self {
        Self::new(max_attempts, [StatusCode::TimedOut, StatusCode::RequestTimeout])
    }

    pub fn should_retry(&self, state: &RetryState, classification: StatusCode) -> bool {
        self.retry_on.contains(&classification) && state.attempts_made < self.max_attempts
    }

    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 0 && !self.retry_on.is_empty()
    }
}

/// Attempt counter of one logical request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    attempts_made: u32,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    /// Count a restart. Only called after a positive `should_retry`.
    pub(crate) fn record_retry(&mut self) {
        self.attempts_made += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_requires_membership() {
        let policy = RetryPolicy::new(3, [StatusCode::Other(503)]);
        let state = RetryState::new();
        assert!(policy.should_retry(&state, StatusCode::Other(503)));
        assert!(!policy.should_retry(&state, StatusCode::Other(500)));
        assert!(!policy.should_retry(&state, StatusCode::Ok));
    }

    #[test]
    fn test_raw_code_matches_its_category() {
        let policy = RetryPolicy::new(2, [StatusCode::Other(408)]);
        let state = RetryState::new();
        assert!(policy.should_retry(&state, StatusCode::from_raw(408)));
        assert!(policy.retry_on.contains(&StatusCode::RequestTimeout));
    }

    #[test]
    fn test_retry_bounded_by_max_attempts() {
        let policy = RetryPolicy::on_timeout(2);
        let mut state = RetryState::new();

        assert!(policy.should_retry(&state, StatusCode::TimedOut));
        state.record_retry();
        assert!(policy.should_retry(&state, StatusCode::RequestTimeout));
        state.record_retry();
        assert!(!policy.should_retry(&state, StatusCode::TimedOut));
        assert_eq!(state.attempts_made(), 2);
    }

    #[test]
    fn test_evaluation_does_not_mutate() {
        let policy = RetryPolicy::on_timeout(1);
        let state = RetryState::new();
        for _ in 0..5 {
            assert!(policy.should_retry(&state, StatusCode::TimedOut));
        }
        assert_eq!(state.attempts_made(), 0);
    }

    #[test]
    fn test_disabled_policies() {
        assert!(!RetryPolicy::none().is_enabled());
        assert!(!RetryPolicy::new(0, [StatusCode::TimedOut]).is_enabled());
        assert!(!RetryPolicy::new(0, [StatusCode::TimedOut])
            .should_retry(&RetryState::new(), StatusCode::TimedOut));
        assert!(RetryPolicy::on_timeout(1).is_enabled());
    }
}
