//! Scalar decoding for primitive result types.

use serde_json::Value;

use crate::decode::shape::PrimitiveKind;

/// A decoded scalar, already coerced to the requested kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    /// Integer above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    Text(String),
}

/// Parse `body` as a single scalar of `kind`.
///
/// Accepted forms: a JSON literal (`42`, `"42"`, `true`), a bare unquoted
/// literal (`hello`), a one-element array (`["hello"]`) or a one-member
/// object (`{"value": 42}`) wrapping a literal.
pub fn parse_scalar(body: &[u8], kind: PrimitiveKind) -> Option<Scalar> {
    let text = std::str::from_utf8(body).ok()?.trim();
    if text.is_empty() {
        return None;
    }
    let literal = match serde_json::from_str::<Value>(text) {
        Ok(value) => unwrap_literal(value)?,
        Err(_) => Value::String(text.to_string()),
    };
    coerce(literal, kind)
}

fn unwrap_literal(value: Value) -> Option<Value> {
    match value {
        Value::Array(mut items) if items.len() == 1 => items.pop().filter(is_literal),
        Value::Object(map) if map.len() == 1 => map.into_iter().next().map(|(_, v)| v).filter(is_literal),
        value if is_literal(&value) => Some(value),
        _ => None,
    }
}

fn is_literal(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

fn coerce(value: Value, kind: PrimitiveKind) -> Option<Scalar> {
    match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(b)) => Some(Scalar::Bool(b)),
        (PrimitiveKind::Bool, Value::String(s)) => s.trim().parse().ok().map(Scalar::Bool),
        (PrimitiveKind::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(Scalar::Integer(i)),
            None => n.as_u64().map(Scalar::Unsigned),
        },
        (PrimitiveKind::Integer, Value::String(s)) => {
            let s = s.trim();
            match s.parse() {
                Ok(i) => Some(Scalar::Integer(i)),
                Err(_) => s.parse().ok().map(Scalar::Unsigned),
            }
        }
        (PrimitiveKind::Float, Value::Number(n)) => n.as_f64().map(Scalar::Float),
        (PrimitiveKind::Float, Value::String(s)) => s.trim().parse().ok().map(Scalar::Float),
        (PrimitiveKind::String, Value::String(s)) => Some(Scalar::Text(s)),
        (PrimitiveKind::String, Value::Number(n)) => Some(Scalar::Text(n.to_string())),
        (PrimitiveKind::String, Value::Bool(b)) => Some(Scalar::Text(b.to_string())),
        _ => None,
    }
}
