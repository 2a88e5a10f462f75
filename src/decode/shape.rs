//! Result shapes.
//!
//! Every type a request can resolve to declares its `Shape` statically, so
//! the decoder dispatch is an exhaustive match rather than runtime type
//! inspection.

use serde::de::DeserializeOwned;
use std::fmt;
use std::ops::Deref;

use crate::decode::primitive::Scalar;
use crate::decode::DecodeError;

/// How a response body maps to a result value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Body is ignored.
    NoContent,
    /// Body bytes are handed over untouched.
    Raw,
    /// Body holds one scalar literal.
    Primitive(PrimitiveKind),
    /// Body is a JSON document.
    Structured,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::NoContent => f.write_str("no_content"),
            Shape::Raw => f.write_str("raw"),
            Shape::Primitive(kind) => write!(f, "primitive:{}", kind),
            Shape::Structured => f.write_str("structured"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Bool,
    Integer,
    Float,
    String,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
        };
        f.write_str(name)
    }
}

/// Shape-specific input handed to `ResponseValue::from_payload`.
#[derive(Debug)]
pub enum Payload<'a> {
    Empty,
    Raw(&'a [u8]),
    Scalar(Scalar),
    Json(&'a [u8]),
}

/// A type a request can resolve to.
pub trait ResponseValue: Sized + Clone + Send + Sync + 'static {
    const SHAPE: Shape;

    /// Build the value from the payload matching `SHAPE`.
    fn from_payload(payload: Payload<'_>) -> Result<Self, DecodeError>;
}

/// Marker for requests whose body is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoContent;

impl ResponseValue for NoContent {
    const SHAPE: Shape = Shape::NoContent;

    fn from_payload(_payload: Payload<'_>) -> Result<Self, DecodeError> {
        Ok(NoContent)
    }
}

impl ResponseValue for Vec<u8> {
    const SHAPE: Shape = Shape::Raw;

    fn from_payload(payload: Payload<'_>) -> Result<Self, DecodeError> {
        match payload {
            Payload::Raw(bytes) => Ok(bytes.to_vec()),
            _ => Err(DecodeError::ShapeMismatch(Self::SHAPE)),
        }
    }
}

macro_rules! primitive_value {
    ($ty:ty, $kind:expr, $variant:ident, $convert:expr) => {
        impl ResponseValue for $ty {
            const SHAPE: Shape = Shape::Primitive($kind);

            fn from_payload(payload: Payload<'_>) -> Result<Self, DecodeError> {
                match payload {
                    Payload::Scalar(Scalar::$variant(v)) => {
                        $convert(v).ok_or(DecodeError::OutOfRange(Self::SHAPE))
                    }
                    _ => Err(DecodeError::ShapeMismatch(Self::SHAPE)),
                }
            }
        }
    };
}

macro_rules! integer_value {
    ($($ty:ty),*) => {$(
        impl ResponseValue for $ty {
            const SHAPE: Shape = Shape::Primitive(PrimitiveKind::Integer);

            fn from_payload(payload: Payload<'_>) -> Result<Self, DecodeError> {
                let converted = match payload {
                    Payload::Scalar(Scalar::Integer(v)) => <$ty>::try_from(v).ok(),
                    Payload::Scalar(Scalar::Unsigned(v)) => <$ty>::try_from(v).ok(),
                    _ => return Err(DecodeError::ShapeMismatch(Self::SHAPE)),
                };
                converted.ok_or(DecodeError::OutOfRange(Self::SHAPE))
            }
        }
    )*};
}

integer_value!(i64, i32, u32, u64);

primitive_value!(bool, PrimitiveKind::Bool, Bool, |v: bool| Some(v));
primitive_value!(f64, PrimitiveKind::Float, Float, |v: f64| Some(v));
primitive_value!(f32, PrimitiveKind::Float, Float, |v: f64| Some(v as f32));
primitive_value!(String, PrimitiveKind::String, Text, |v: String| Some(v));

/// Structured JSON result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> ResponseValue for Json<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    const SHAPE: Shape = Shape::Structured;

    fn from_payload(payload: Payload<'_>) -> Result<Self, DecodeError> {
        match payload {
            Payload::Json(bytes) => Ok(Json(serde_json::from_slice(bytes)?)),
            _ => Err(DecodeError::ShapeMismatch(Self::SHAPE)),
        }
    }
}

impl ResponseValue for serde_json::Value {
    const SHAPE: Shape = Shape::Structured;

    fn from_payload(payload: Payload<'_>) -> Result<Self, DecodeError> {
        match payload {
            Payload::Json(bytes) => Ok(serde_json::from_slice(bytes)?),
            _ => Err(DecodeError::ShapeMismatch(Self::SHAPE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_are_static() {
        assert_eq!(NoContent::SHAPE, Shape::NoContent);
        assert_eq!(<Vec<u8>>::SHAPE, Shape::Raw);
        assert_eq!(i64::SHAPE, Shape::Primitive(PrimitiveKind::Integer));
        assert_eq!(String::SHAPE, Shape::Primitive(PrimitiveKind::String));
        assert_eq!(<Json<Vec<u32>>>::SHAPE, Shape::Structured);
    }

    #[test]
    fn test_narrowing_integers() {
        assert_eq!(i32::from_payload(Payload::Scalar(Scalar::Integer(7))).unwrap(), 7);
        assert!(matches!(
            u32::from_payload(Payload::Scalar(Scalar::Integer(-1))),
            Err(DecodeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_unsigned_scalar() {
        assert_eq!(u64::from_payload(Payload::Scalar(Scalar::Unsigned(u64::MAX))).unwrap(), u64::MAX);
        assert!(matches!(
            i64::from_payload(Payload::Scalar(Scalar::Unsigned(u64::MAX))),
            Err(DecodeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_mismatched_payload() {
        assert!(matches!(
            bool::from_payload(Payload::Scalar(Scalar::Integer(1))),
            Err(DecodeError::ShapeMismatch(_))
        ));
        assert!(matches!(
            <Vec<u8>>::from_payload(Payload::Empty),
            Err(DecodeError::ShapeMismatch(Shape::Raw))
        ));
    }
}
