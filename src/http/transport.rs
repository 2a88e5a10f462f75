//! Transport seam.
//!
//! # Responsibilities
//! - Perform one attempt for a descriptor and report it as a `ResponseEnvelope`
//! - Map transport failures to `TransportErrorKind`
//!
//! # Design Decisions
//! - A transport never fails: every outcome, including errors, is an envelope
//! - The transport owns the deadline; the resolver only reads the result

use std::future::Future;
use std::time::Instant;

use crate::http::envelope::{ResponseEnvelope, TransportError, TransportErrorKind};
use crate::http::request::RequestDescriptor;

/// Performs one attempt of a logical request.
pub trait Transport: Send + Sync {
    fn send(&self, descriptor: &RequestDescriptor) -> impl Future<Output = ResponseEnvelope> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, descriptor: &RequestDescriptor) -> ResponseEnvelope {
        let start = Instant::now();
        let mut request = self
            .client
            .request(descriptor.method.clone(), descriptor.url.clone())
            .headers(descriptor.headers.clone());
        if !descriptor.timeout.is_zero() {
            request = request.timeout(descriptor.timeout);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ResponseEnvelope::failed(map_error(&e), start.elapsed()),
        };

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        match response.bytes().await {
            Ok(body) => ResponseEnvelope::received(status, body.to_vec(), start.elapsed()).with_headers(headers),
            Err(e) => ResponseEnvelope {
                status: Some(status),
                headers,
                body: None,
                error: Some(map_error(&e)),
                elapsed: start.elapsed(),
            },
        }
    }
}

fn map_error(error: &reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        TransportErrorKind::TimedOut
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, error.to_string())
}
