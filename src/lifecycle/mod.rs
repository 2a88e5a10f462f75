//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Client construction (context.rs):
//!     Config or explicit Hooks → ClientContext → shared via Arc with resolver
//!
//! Client teardown (context.rs):
//!     teardown() → hooks cleared → later resolutions run without them
//!
//! Per logical request (cancel.rs):
//!     RequestHandle created → cancel() from any task → resolver polls once
//! ```
//!
//! # Design Decisions
//! - Client-wide hooks are explicit context, never ambient statics
//! - Cancellation is best-effort and never pre-empts a running delivery

pub mod cancel;
pub mod context;

pub use cancel::RequestHandle;
pub use context::{ClientContext, Hooks, SuccessObserver, UnauthorizedHook};
