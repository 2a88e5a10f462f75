//! Metrics recording.
//!
//! # Metrics
//! - `resolver_responses_total` (counter): attempts by method, status
//! - `resolver_response_duration_seconds` (histogram): transport latency
//! - `resolver_retries_total` (counter): restarts by reason
//! - `resolver_decode_failures_total` (counter): failures by result shape
//! - `resolver_successes_total` (counter): delivered successes by host

use std::sync::Arc;
use std::time::Duration;

use crate::decode::Shape;
use crate::http::status::StatusCode;
use crate::lifecycle::context::SuccessObserver;

/// Record one attempt's outcome.
pub fn record_response(method: &str, status: StatusCode, elapsed: Duration) {
    let status_label = match status.raw() {
        Some(raw) => raw.to_string(),
        None => status.name().unwrap_or("unknown").to_string(),
    };
    ::metrics::counter!(
        "resolver_responses_total",
        "method" => method.to_string(),
        "status" => status_label
    )
    .increment(1);
    ::metrics::histogram!("resolver_response_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record a restart of a logical request.
pub fn record_retry(reason: &'static str) {
    ::metrics::counter!("resolver_retries_total", "reason" => reason).increment(1);
}

/// Record a body that did not match its expected shape.
pub fn record_decode_failure(shape: Shape) {
    ::metrics::counter!("resolver_decode_failures_total", "shape" => shape.to_string()).increment(1);
}

/// Success observer that counts delivered successes per host.
pub fn success_counter() -> SuccessObserver {
    Arc::new(|host: &str, _path: &str| {
        ::metrics::counter!("resolver_successes_total", "host" => host.to_string()).increment(1);
    })
}
