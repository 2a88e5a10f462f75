//! Response resolution subsystem.
//!
//! # Data Flow
//! ```text
//! ResponseEnvelope (one attempt)
//!     → engine.rs (cancel guard, classify, retry, success/failure branch)
//!     → decode (success set only)
//!     → delivery.rs (success sinks, scheduled after the additional timeout)
//!     → caller callbacks
//! ```
//!
//! # Design Decisions
//! - The resolver never performs I/O; the client drives the attempt loop
//! - Scheduling is behind a trait so tests can control time

pub mod delivery;
pub mod engine;

pub use delivery::{InlineScheduler, Scheduler, SuccessDelivery, SuccessSink, Task, TokioScheduler};
pub use engine::{Resolution, ResponseResolver};
