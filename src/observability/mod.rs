//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver and client produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!     → tracing.rs (one span per logical request, keyed by request ID)
//! ```
//!
//! # Design Decisions
//! - Emitting a log event or metric never fails a resolution
//! - Metrics are recorded through the `metrics` facade; installing an
//!   exporter is left to the host application
//! - Request ID flows through every event of a logical request

pub mod logging;
pub mod metrics;
pub mod tracing;
