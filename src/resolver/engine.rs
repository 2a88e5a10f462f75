//! Response resolution state machine.
//!
//! # States
//! ```text
//! Arrived ──cancelled──▶ (halt, no callbacks)
//!    │
//!    ▼
//! Classified ──retry──▶ Retrying (restart the logical request)
//!    │
//!    ├─ success set ──▶ Decoding ──▶ Success (scheduled) | Failure(undecodable)
//!    ├─ 401 ──────────▶ Unauthorized ──▶ hook + override or Failure
//!    ├─ other status ─▶ ServerError ──▶ Failure(status, server message)
//!    └─ no response ──▶ TransportError ──▶ timeout callback or Failure,
//!                                          then optional restart on timeout
//! ```
//!
//! # Design Decisions
//! - Resolution is synchronous; only the success delivery is deferred
//! - Retry pre-empts every other branch, including success
//! - Failures are delivered immediately; successes honour the additional timeout

use std::sync::Arc;

use crate::decode::{decode, DateStrategy, ResponseValue};
use crate::http::envelope::ResponseEnvelope;
use crate::http::request::{Callbacks, Request};
use crate::http::response::{
    server_message, ResponseError, GENERIC_MESSAGE, TIMEOUT_MESSAGE, UNAUTHORIZED_MESSAGE,
};
use crate::http::status::{classify, StatusCode};
use crate::lifecycle::{ClientContext, Hooks, RequestHandle};
use crate::observability::metrics;
use crate::resilience::{remaining_delay, RetryState};
use crate::resolver::delivery::{Scheduler, SuccessDelivery};

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The request was cancelled before resolution began.
    Cancelled,
    /// The logical request must be restarted.
    Retry,
    /// A success was decoded and handed to the scheduler.
    Succeeded(StatusCode),
    /// A failure was delivered (or absorbed by an override callback).
    Failed(StatusCode),
}

impl Resolution {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Resolution::Retry)
    }
}

/// Turns attempt envelopes into callback deliveries.
pub struct ResponseResolver<S> {
    context: Arc<ClientContext>,
    scheduler: S,
}

impl<S: Scheduler> ResponseResolver<S> {
    pub fn new(context: Arc<ClientContext>, scheduler: S) -> Self {
        Self { context, scheduler }
    }

    pub fn context(&self) -> &Arc<ClientContext> {
        &self.context
    }

    /// Resolve one attempt of `request`.
    ///
    /// On `Resolution::Retry` the attempt counter in `state` has already
    /// been incremented and the caller must re-send the descriptor.
    pub fn resolve<T: ResponseValue>(
        &self,
        request: &Request<T>,
        handle: &RequestHandle,
        state: &mut RetryState,
        envelope: ResponseEnvelope,
    ) -> Resolution {
        if handle.is_cancelled() {
            tracing::debug!(request_id = %handle.id(), "Request cancelled, dropping response");
            return Resolution::Cancelled;
        }

        let hooks = self.context.hooks();
        if envelope.has_response() {
            self.resolve_received(request, handle, state, envelope, &hooks)
        } else {
            self.resolve_transport_error(request, handle, state, envelope)
        }
    }

    fn resolve_received<T: ResponseValue>(
        &self,
        request: &Request<T>,
        handle: &RequestHandle,
        state: &mut RetryState,
        envelope: ResponseEnvelope,
        hooks: &Hooks,
    ) -> Resolution {
        let descriptor = &request.descriptor;
        let status = classify(envelope.status, envelope.error.as_ref().map(|e| &e.kind));

        tracing::info!(
            request_id = %handle.id(),
            method = %descriptor.method,
            url = %descriptor.url,
            status = ?envelope.status,
            attempt = state.attempts_made() + 1,
            elapsed_ms = envelope.elapsed.as_millis() as u64,
            "Response received"
        );
        if self.context.metrics_enabled() {
            metrics::record_response(descriptor.method.as_str(), status, envelope.elapsed);
        }

        if descriptor.retry.should_retry(state, status) {
            state.record_retry();
            tracing::info!(
                request_id = %handle.id(),
                status = %status,
                attempt = state.attempts_made(),
                "Retry condition satisfied, starting the request again"
            );
            if self.context.metrics_enabled() {
                metrics::record_retry("status");
            }
            return Resolution::Retry;
        }

        if descriptor.success_codes.contains(&status) {
            return self.resolve_success(request, handle, status, envelope, hooks);
        }

        if status == StatusCode::Unauthorized {
            if let Some(hook) = &hooks.unauthorized {
                hook();
            }
            let error = ResponseError::new(StatusCode::Unauthorized, UNAUTHORIZED_MESSAGE)
                .with_body(envelope.body)
                .with_cause(envelope.error.map(|e| e.message));
            log_failure(request, handle, &error);
            match &request.callbacks.on_unauthorized {
                Some(callback) => callback(),
                None => deliver_failure(&request.callbacks, error),
            }
            return Resolution::Failed(StatusCode::Unauthorized);
        }

        let error = ResponseError::new(status, server_message(envelope.body.as_deref()))
            .with_body(envelope.body)
            .with_cause(envelope.error.map(|e| e.message));
        log_failure(request, handle, &error);
        deliver_failure(&request.callbacks, error);
        Resolution::Failed(status)
    }

    fn resolve_success<T: ResponseValue>(
        &self,
        request: &Request<T>,
        handle: &RequestHandle,
        status: StatusCode,
        envelope: ResponseEnvelope,
        hooks: &Hooks,
    ) -> Resolution {
        let descriptor = &request.descriptor;
        let dates = DateStrategy::resolve(descriptor.date_strategy.as_ref(), hooks.date_strategy.as_ref());

        let value = match decode::<T>(envelope.body.as_deref(), &dates).into_result() {
            Ok(value) => value,
            Err(e) => {
                if self.context.metrics_enabled() {
                    metrics::record_decode_failure(T::SHAPE);
                }
                let error = ResponseError::new(StatusCode::Undecodable, GENERIC_MESSAGE)
                    .with_body(envelope.body)
                    .with_cause(Some(e.to_string()));
                log_failure(request, handle, &error);
                deliver_failure(&request.callbacks, error);
                return Resolution::Failed(StatusCode::Undecodable);
            }
        };

        let delay = remaining_delay(descriptor.additional_timeout, envelope.elapsed);
        let delivery = SuccessDelivery {
            host: descriptor.host().to_string(),
            path: descriptor.path().to_string(),
            headers: envelope.headers,
            status,
            body: envelope.body.unwrap_or_default(),
            value,
            sinks: request.callbacks.success_sinks(hooks.success_observer.clone()),
        };

        tracing::debug!(
            request_id = %handle.id(),
            delay_ms = delay.as_millis() as u64,
            "Scheduling success delivery"
        );
        self.scheduler.schedule(delay, Box::new(move || delivery.deliver()));
        Resolution::Succeeded(status)
    }

    fn resolve_transport_error<T: ResponseValue>(
        &self,
        request: &Request<T>,
        handle: &RequestHandle,
        state: &mut RetryState,
        envelope: ResponseEnvelope,
    ) -> Resolution {
        let descriptor = &request.descriptor;
        let timed_out = envelope.error.as_ref().is_some_and(|e| e.is_timeout());
        let status = if timed_out {
            StatusCode::TimedOut
        } else {
            StatusCode::CannotConnectToHost
        };

        tracing::info!(
            request_id = %handle.id(),
            method = %descriptor.method,
            url = %descriptor.url,
            status = %status,
            attempt = state.attempts_made() + 1,
            elapsed_ms = envelope.elapsed.as_millis() as u64,
            "Transport failed"
        );
        if self.context.metrics_enabled() {
            metrics::record_response(descriptor.method.as_str(), status, envelope.elapsed);
        }

        let cause = envelope.error.map(|e| e.message);
        if !timed_out {
            let error = ResponseError::new(status, GENERIC_MESSAGE).with_cause(cause);
            log_failure(request, handle, &error);
            deliver_failure(&request.callbacks, error);
            return Resolution::Failed(status);
        }

        let error = ResponseError::new(StatusCode::TimedOut, TIMEOUT_MESSAGE).with_cause(cause);
        log_failure(request, handle, &error);
        match &request.callbacks.on_timeout {
            Some(callback) => callback(),
            None => deliver_failure(&request.callbacks, error),
        }

        if descriptor.retry.should_retry(state, StatusCode::TimedOut) {
            state.record_retry();
            tracing::info!(
                request_id = %handle.id(),
                attempt = state.attempts_made(),
                "Request timed out, trying again"
            );
            if self.context.metrics_enabled() {
                metrics::record_retry("timeout");
            }
            return Resolution::Retry;
        }
        Resolution::Failed(StatusCode::TimedOut)
    }
}

fn deliver_failure<T>(callbacks: &Callbacks<T>, error: ResponseError) {
    if let Some(callback) = &callbacks.on_error {
        callback(error);
    }
}

fn log_failure<T: ResponseValue>(request: &Request<T>, handle: &RequestHandle, error: &ResponseError) {
    tracing::error!(
        request_id = %handle.id(),
        method = %request.descriptor.method,
        url = %request.descriptor.url,
        status = %error.status,
        message = %error.message,
        cause = error.cause.as_deref().unwrap_or(""),
        body = error.body_text().as_deref().unwrap_or(""),
        "Request failed"
    );
}
