//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Classified attempt:
//!     → retries.rs (restart the logical request while budget remains)
//!     → timeouts.rs (hold back fast successes to the minimum latency)
//! ```
//!
//! # Design Decisions
//! - Transport deadlines belong to the transport; this layer never races it
//! - A retry fully supersedes the attempt that triggered it

pub mod retries;
pub mod timeouts;

pub use retries::{RetryPolicy, RetryState};
pub use timeouts::remaining_delay;
