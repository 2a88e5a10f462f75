//! Status classification.
//!
//! # Responsibilities
//! - Map a raw HTTP status or a transport failure to a semantic `StatusCode`
//! - Provide the textual names used in configuration files
//!
//! # Design Decisions
//! - Classification is a pure function and never fails
//! - Unmapped HTTP codes degrade to `Other(raw)`
//! - A timed-out transport error wins over any partial HTTP status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::http::envelope::TransportErrorKind;

/// Semantic category of a response outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr", into = "StatusRepr")]
pub enum StatusCode {
    Ok,
    Created,
    Accepted,
    NoContent,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    RequestTimeout,
    Conflict,
    TooManyRequests,
    /// The transport gave up waiting for the response.
    TimedOut,
    /// Any non-timeout transport failure.
    CannotConnectToHost,
    /// A success status whose body did not match the expected shape.
    Undecodable,
    /// Any HTTP status without a dedicated category.
    Other(u16),
}

impl StatusCode {
    /// Map a numeric HTTP status to its category.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            200 => Self::Ok,
            201 => Self::Created,
            202 => Self::Accepted,
            204 => Self::NoContent,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            408 => Self::RequestTimeout,
            409 => Self::Conflict,
            429 => Self::TooManyRequests,
            other => Self::Other(other),
        }
    }

    /// Numeric HTTP status, `None` for transport-level categories.
    pub fn raw(&self) -> Option<u16> {
        match self {
            Self::Ok => Some(200),
            Self::Created => Some(201),
            Self::Accepted => Some(202),
            Self::NoContent => Some(204),
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::RequestTimeout => Some(408),
            Self::Conflict => Some(409),
            Self::TooManyRequests => Some(429),
            Self::TimedOut | Self::CannotConnectToHost | Self::Undecodable => None,
            Self::Other(raw) => Some(*raw),
        }
    }

    /// `Other(raw)` for a code with a dedicated category becomes that
    /// category, so `Other(408)` and `RequestTimeout` compare equal.
    pub fn canonical(self) -> Self {
        match self {
            Self::Other(raw) => Self::from_raw(raw),
            status => status,
        }
    }

    /// True for `TimedOut` and `RequestTimeout`.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut | Self::RequestTimeout)
    }

    /// Configuration name for categories that have one.
    pub fn name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Ok => "ok",
            Self::Created => "created",
            Self::Accepted => "accepted",
            Self::NoContent => "no_content",
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::RequestTimeout => "request_timeout",
            Self::Conflict => "conflict",
            Self::TooManyRequests => "too_many_requests",
            Self::TimedOut => "timed_out",
            Self::CannotConnectToHost => "cannot_connect_to_host",
            Self::Undecodable => "undecodable",
            Self::Other(_) => return None,
        };
        Some(name)
    }

    fn from_name(name: &str) -> Option<Self> {
        let status = match name {
            "ok" => Self::Ok,
            "created" => Self::Created,
            "accepted" => Self::Accepted,
            "no_content" => Self::NoContent,
            "bad_request" => Self::BadRequest,
            "unauthorized" => Self::Unauthorized,
            "forbidden" => Self::Forbidden,
            "not_found" => Self::NotFound,
            "request_timeout" => Self::RequestTimeout,
            "conflict" => Self::Conflict,
            "too_many_requests" => Self::TooManyRequests,
            "timed_out" => Self::TimedOut,
            "cannot_connect_to_host" => Self::CannotConnectToHost,
            "undecodable" => Self::Undecodable,
            _ => return None,
        };
        Some(status)
    }
}

impl FromStr for StatusCode {
    type Err = String;

    /// Accepts a numeric code (`"503"`) or a category name (`"timed_out"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u16>() {
            Ok(raw) => Ok(Self::from_raw(raw)),
            Err(_) => Self::from_name(s).ok_or_else(|| format!("unknown status category '{}'", s)),
        }
    }
}

impl From<u16> for StatusCode {
    fn from(raw: u16) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.raw()) {
            (Some(name), Some(raw)) => write!(f, "{} ({})", name, raw),
            (Some(name), None) => f.write_str(name),
            (None, Some(raw)) => write!(f, "other ({})", raw),
            (None, None) => f.write_str("unknown"),
        }
    }
}

/// Classify one attempt's outcome.
pub fn classify(raw_status: Option<u16>, transport_error: Option<&TransportErrorKind>) -> StatusCode {
    match (transport_error, raw_status) {
        (Some(TransportErrorKind::TimedOut), _) => StatusCode::TimedOut,
        (_, Some(raw)) => StatusCode::from_raw(raw),
        (_, None) => StatusCode::CannotConnectToHost,
    }
}

/// Wire form of a `StatusCode` in config files: a number or a name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u16),
    Name(String),
}

impl TryFrom<StatusRepr> for StatusCode {
    type Error = String;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(raw) => Ok(StatusCode::from_raw(raw)),
            StatusRepr::Name(name) => StatusCode::from_name(&name)
                .ok_or_else(|| format!("unknown status category '{}'", name)),
        }
    }
}

impl From<StatusCode> for StatusRepr {
    fn from(status: StatusCode) -> Self {
        match status.raw() {
            Some(raw) => StatusRepr::Code(raw),
            None => StatusRepr::Name(status.name().unwrap_or("unknown").to_string()),
        }
    }
}
