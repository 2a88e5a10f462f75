//! Response payloads handed to callbacks.
//!
//! # Responsibilities
//! - Carry a failure (classification, message, raw body) to the caller
//! - Carry a success with its headers, status and raw body
//! - Extract a human-readable error message from a server body
//!
//! # Design Decisions
//! - Server messages are best-effort: a `message` field of a JSON object,
//!   else the only string of a one-element JSON array, else a generic text

use reqwest::header::HeaderMap;
use serde_json::Value;
use thiserror::Error;

use crate::http::status::StatusCode;

pub const GENERIC_MESSAGE: &str = "Something went wrong...";
pub const UNAUTHORIZED_MESSAGE: &str = "Not authorized";
pub const TIMEOUT_MESSAGE: &str = "Connection timeout";

/// Payload of the failure channel.
#[derive(Debug, Clone, Error)]
#[error("{status}: {message}")]
pub struct ResponseError {
    /// Classified outcome.
    pub status: StatusCode,
    /// Message suitable for display.
    pub message: String,
    /// Raw response body, when one arrived.
    pub body: Option<Vec<u8>>,
    /// Underlying transport or decode error, for diagnostics.
    pub cause: Option<String>,
}

impl ResponseError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: None,
            cause: None,
        }
    }

    pub fn with_body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }

    pub fn with_cause(mut self, cause: Option<String>) -> Self {
        self.cause = cause;
        self
    }

    /// Body as lossy UTF-8, for logs.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// Payload of the extended success channel.
#[derive(Debug, Clone)]
pub struct ExtendedResponse<T> {
    pub headers: HeaderMap,
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub value: T,
}

/// Best-effort error message from a server body.
pub fn server_message(body: Option<&[u8]>) -> String {
    body.and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
        .and_then(|value| match value {
            Value::Object(mut map) => match map.remove("message") {
                Some(Value::String(message)) => Some(message),
                _ => None,
            },
            Value::Array(mut items) if items.len() == 1 => match items.pop() {
                Some(Value::String(message)) => Some(message),
                _ => None,
            },
            _ => None,
        })
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string())
}
