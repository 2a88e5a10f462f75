//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! Request<T> (request.rs)
//!     → client.rs (attempt loop)
//!     → transport.rs (one HTTP exchange) → ResponseEnvelope (envelope.rs)
//!     → status.rs (classification)
//!     → [resolver decides the branch]
//!     → response.rs (ResponseError / ExtendedResponse to callbacks)
//! ```

pub mod client;
pub mod envelope;
pub mod request;
pub mod response;
pub mod status;
pub mod transport;

pub use client::Client;
pub use envelope::{ResponseEnvelope, TransportError, TransportErrorKind};
pub use request::{Callbacks, Request, RequestDescriptor};
pub use response::{ExtendedResponse, ResponseError};
pub use status::{classify, StatusCode};
pub use transport::{ReqwestTransport, Transport};
