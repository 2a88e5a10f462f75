//! Per-attempt response envelope produced by a transport.

use reqwest::header::HeaderMap;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The transport deadline elapsed.
    TimedOut,
    /// The connection could not be established.
    Connect,
    /// Anything else (TLS, protocol, body read, ...).
    Other,
}

/// Failure reported by the transport for one attempt.
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timed_out() -> Self {
        Self::new(TransportErrorKind::TimedOut, "The request timed out.")
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::TimedOut
    }
}

/// Everything one attempt produced.
///
/// `status` is `None` when no HTTP exchange completed.
#[derive(Debug, Clone, Default)]
pub struct ResponseEnvelope {
    pub status: Option<u16>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub error: Option<TransportError>,
    pub elapsed: Duration,
}

impl ResponseEnvelope {
    /// Envelope for a completed HTTP exchange.
    pub fn received(status: u16, body: impl Into<Vec<u8>>, elapsed: Duration) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            elapsed,
            ..Default::default()
        }
    }

    /// Envelope for an attempt that failed before a response arrived.
    pub fn failed(error: TransportError, elapsed: Duration) -> Self {
        Self {
            error: Some(error),
            elapsed,
            ..Default::default()
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// True when an HTTP response arrived, whatever its status.
    pub fn has_response(&self) -> bool {
        self.status.is_some()
    }
}
