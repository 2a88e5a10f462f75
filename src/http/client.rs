//! Attempt loop for logical requests.
//!
//! # Responsibilities
//! - Send a descriptor through the transport
//! - Feed each envelope to the resolver
//! - Restart the logical request while the resolver asks for a retry
//!
//! # Design Decisions
//! - Retries restart immediately; there is no backoff between attempts
//! - Every attempt of one logical request runs inside the same span

use std::sync::Arc;
use tracing::Instrument;

use crate::decode::ResponseValue;
use crate::http::request::Request;
use crate::http::transport::Transport;
use crate::lifecycle::{ClientContext, RequestHandle};
use crate::observability::tracing::request_span;
use crate::resilience::RetryState;
use crate::resolver::{Resolution, ResponseResolver, Scheduler};

/// Executes requests against a transport and resolves their outcomes.
pub struct Client<Tr, S> {
    transport: Tr,
    resolver: ResponseResolver<S>,
}

impl<Tr: Transport, S: Scheduler> Client<Tr, S> {
    pub fn new(transport: Tr, context: Arc<ClientContext>, scheduler: S) -> Self {
        Self {
            transport,
            resolver: ResponseResolver::new(context, scheduler),
        }
    }

    /// Client-wide hooks; call `teardown` on it when the client goes away.
    pub fn context(&self) -> &Arc<ClientContext> {
        self.resolver.context()
    }

    pub fn resolver(&self) -> &ResponseResolver<S> {
        &self.resolver
    }

    /// Run `request` to a terminal resolution.
    ///
    /// Success callbacks may still be pending on the scheduler when this
    /// returns `Resolution::Succeeded`.
    pub async fn execute<T: ResponseValue>(&self, request: &Request<T>, handle: &RequestHandle) -> Resolution {
        let descriptor = &request.descriptor;
        let span = request_span(handle.id(), descriptor.method.as_str(), descriptor.url.as_str());

        async {
            let mut state = RetryState::new();
            loop {
                if handle.is_cancelled() {
                    tracing::debug!("Request cancelled before sending");
                    return Resolution::Cancelled;
                }

                let envelope = self.transport.send(descriptor).await;
                let resolution = self.resolver.resolve(request, handle, &mut state, envelope);
                if resolution.is_terminal() {
                    tracing::debug!(resolution = ?resolution, attempts = state.attempts_made() + 1, "Request resolved");
                    return resolution;
                }
            }
        }
        .instrument(span)
        .await
    }
}
