//! HTTP response resolution library.
//!
//! Turns the outcome of an HTTP exchange into exactly one terminal
//! callback: classify the status, retry when asked, decode successes into
//! the caller's result type and deliver failures with a readable message.

pub mod config;
pub mod decode;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod resolver;

pub use config::schema::ClientConfig;
pub use decode::{DateStrategy, Json, NoContent, ResponseValue};
pub use http::{Client, ReqwestTransport, Request, RequestDescriptor, ResponseError, StatusCode};
pub use lifecycle::{ClientContext, Hooks, RequestHandle};
pub use resilience::RetryPolicy;
pub use resolver::{InlineScheduler, Resolution, ResponseResolver, TokioScheduler};
