//! Result decoding subsystem.
//!
//! # Data Flow
//! ```text
//! success status + body
//!     → shape.rs (static Shape of the requested result type)
//!     → decoder.rs (dispatch: no content / raw / primitive / structured)
//!         → primitive.rs (scalar literal parsing)
//!         → date.rs (date strategy active during structured decoding)
//!     → DecodedOutcome
//! ```
//!
//! # Design Decisions
//! - Shape is a closed enum resolved per result type at compile time
//! - Decoding never panics; every failure becomes `DecodedOutcome::DecodeFailure`
//! - Date strategy resolution: request override → context default → ISO-8601

pub mod date;
pub mod decoder;
pub mod primitive;
pub mod shape;

use thiserror::Error;

pub use date::DateStrategy;
pub use decoder::{decode, DecodedOutcome};
pub use primitive::Scalar;
pub use shape::{Json, NoContent, Payload, PrimitiveKind, ResponseValue, Shape};

/// Why a body could not be turned into the requested value.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The response carried no body at all.
    #[error("response has no body")]
    MissingBody,

    /// The body is not a single literal of the expected kind.
    #[error("body is not a {kind} literal: {body}")]
    Primitive { kind: PrimitiveKind, body: String },

    /// The scalar parsed but does not fit the target type.
    #[error("value out of range for {0}")]
    OutOfRange(Shape),

    /// A payload was handed to a type of a different shape.
    #[error("payload does not match shape {0}")]
    ShapeMismatch(Shape),

    /// Structured decoding failed (syntax, schema or date format).
    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),
}
