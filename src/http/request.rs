//! Request descriptors and per-request callbacks.
//!
//! # Responsibilities
//! - Describe one logical request (target, timeouts, retry and success sets)
//! - Hold the caller's optional callback sinks
//!
//! # Design Decisions
//! - Descriptors are immutable once a request starts; the retry counter
//!   lives in the in-flight execution, not here
//! - Callbacks are `Arc<dyn Fn>` so a scheduled delivery can own them

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::schema::ClientConfig;
use crate::decode::{DateStrategy, ResponseValue};
use crate::http::response::{ExtendedResponse, ResponseError};
use crate::http::status::StatusCode;
use crate::resilience::RetryPolicy;

/// What to send and how to judge the answer.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Transport deadline.
    pub timeout: Duration,
    /// Minimum perceived latency of a success.
    pub additional_timeout: Duration,
    pub retry: RetryPolicy,
    pub success_codes: HashSet<StatusCode>,
    /// Overrides the context's date strategy.
    pub date_strategy: Option<DateStrategy>,
}

impl RequestDescriptor {
    /// Descriptor with library defaults and retries disabled.
    pub fn new(method: Method, url: Url) -> Self {
        Self::from_config(method, url, &ClientConfig::default())
    }

    /// Descriptor seeded from configuration defaults.
    ///
    /// The date strategy is left to the context; `from_config` only copies
    /// per-request values.
    pub fn from_config(method: Method, url: Url, config: &ClientConfig) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            timeout: config.defaults.timeout(),
            additional_timeout: config.defaults.additional_timeout(),
            retry: config.retries.policy(),
            success_codes: config.defaults.success_codes.iter().map(|c| c.canonical()).collect(),
            date_strategy: None,
        }
    }

    pub fn get(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Method::GET, Url::parse(url)?))
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn additional_timeout(mut self, additional: Duration) -> Self {
        self.additional_timeout = additional;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn success_codes(mut self, codes: impl IntoIterator<Item = StatusCode>) -> Self {
        self.success_codes = codes.into_iter().map(StatusCode::canonical).collect();
        self
    }

    pub fn date_strategy(mut self, strategy: DateStrategy) -> Self {
        self.date_strategy = Some(strategy);
        self
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}

pub type ValueCallback<T> = Arc<dyn Fn(T) + Send + Sync>;
pub type ExtendedCallback<T> = Arc<dyn Fn(ExtendedResponse<T>) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(ResponseError) + Send + Sync>;
pub type SignalCallback = Arc<dyn Fn() + Send + Sync>;

/// Optional sinks of one request.
pub struct Callbacks<T> {
    pub on_success: Option<ValueCallback<T>>,
    pub on_success_extended: Option<ExtendedCallback<T>>,
    pub on_complete: Option<SignalCallback>,
    pub on_error: Option<ErrorCallback>,
    /// Replaces the error callback for 401 responses.
    pub on_unauthorized: Option<SignalCallback>,
    /// Replaces the error callback for transport timeouts.
    pub on_timeout: Option<SignalCallback>,
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_success_extended: None,
            on_complete: None,
            on_error: None,
            on_unauthorized: None,
            on_timeout: None,
        }
    }
}

impl<T> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_success_extended", &self.on_success_extended.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_unauthorized", &self.on_unauthorized.is_some())
            .field("on_timeout", &self.on_timeout.is_some())
            .finish()
    }
}

/// A descriptor together with the callbacks of its result type.
#[derive(Debug)]
pub struct Request<T: ResponseValue> {
    pub descriptor: RequestDescriptor,
    pub callbacks: Callbacks<T>,
}

impl<T: ResponseValue> Request<T> {
    pub fn new(descriptor: RequestDescriptor) -> Self {
        Self {
            descriptor,
            callbacks: Callbacks::default(),
        }
    }

    pub fn on_success(mut self, f: impl Fn(T) + Send + Sync + 'static) -> Self {
        self.callbacks.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_success_extended(mut self, f: impl Fn(ExtendedResponse<T>) + Send + Sync + 'static) -> Self {
        self.callbacks.on_success_extended = Some(Arc::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_complete = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(ResponseError) + Send + Sync + 'static) -> Self {
        self.callbacks.on_error = Some(Arc::new(f));
        self
    }

    pub fn on_unauthorized(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_unauthorized = Some(Arc::new(f));
        self
    }

    pub fn on_timeout(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_timeout = Some(Arc::new(f));
        self
    }
}
