//! Shape-directed body decoding.

use crate::decode::date::{self, DateStrategy};
use crate::decode::primitive::parse_scalar;
use crate::decode::shape::{Payload, ResponseValue, Shape};
use crate::decode::DecodeError;

/// Result of decoding one response body.
#[derive(Debug)]
pub enum DecodedOutcome<T> {
    /// The no-content marker value.
    Empty(T),
    Primitive(T),
    /// A structured value, or the untouched body for raw results.
    Structured(T),
    DecodeFailure(DecodeError),
}

impl<T> DecodedOutcome<T> {
    pub fn into_result(self) -> Result<T, DecodeError> {
        match self {
            DecodedOutcome::Empty(v) | DecodedOutcome::Primitive(v) | DecodedOutcome::Structured(v) => Ok(v),
            DecodedOutcome::DecodeFailure(e) => Err(e),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DecodedOutcome::DecodeFailure(_))
    }
}

/// Decode `body` into `T`, first matching shape wins.
pub fn decode<T: ResponseValue>(body: Option<&[u8]>, dates: &DateStrategy) -> DecodedOutcome<T> {
    let outcome = match (T::SHAPE, body) {
        (Shape::NoContent, _) => match T::from_payload(Payload::Empty) {
            Ok(v) => DecodedOutcome::Empty(v),
            Err(e) => DecodedOutcome::DecodeFailure(e),
        },
        (_, None) => DecodedOutcome::DecodeFailure(DecodeError::MissingBody),
        (Shape::Raw, Some(bytes)) => match T::from_payload(Payload::Raw(bytes)) {
            Ok(v) => DecodedOutcome::Structured(v),
            Err(e) => DecodedOutcome::DecodeFailure(e),
        },
        (Shape::Primitive(kind), Some(bytes)) => match parse_scalar(bytes, kind) {
            Some(scalar) => match T::from_payload(Payload::Scalar(scalar)) {
                Ok(v) => DecodedOutcome::Primitive(v),
                Err(e) => DecodedOutcome::DecodeFailure(e),
            },
            None => DecodedOutcome::DecodeFailure(DecodeError::Primitive {
                kind,
                body: String::from_utf8_lossy(bytes).into_owned(),
            }),
        },
        (Shape::Structured, Some(bytes)) => {
            match date::with_strategy(dates, || T::from_payload(Payload::Json(bytes))) {
                Ok(v) => DecodedOutcome::Structured(v),
                Err(e) => DecodedOutcome::DecodeFailure(e),
            }
        }
    };

    if let DecodedOutcome::DecodeFailure(e) = &outcome {
        tracing::error!(
            result_type = std::any::type_name::<T>(),
            shape = %T::SHAPE,
            error = %e,
            "Unable to decode response"
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::shape::{Json, NoContent};
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Account {
        id: u64,
        name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    struct Stamp {
        #[serde(with = "crate::decode::date")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_no_content_ignores_body() {
        let outcome = decode::<NoContent>(Some(b"not json at all"), &DateStrategy::Iso8601);
        assert!(matches!(outcome, DecodedOutcome::Empty(NoContent)));
        let outcome = decode::<NoContent>(None, &DateStrategy::Iso8601);
        assert!(matches!(outcome, DecodedOutcome::Empty(NoContent)));
    }

    #[test]
    fn test_raw_is_untouched() {
        let body = [0u8, 159, 146, 150];
        match decode::<Vec<u8>>(Some(&body), &DateStrategy::Iso8601) {
            DecodedOutcome::Structured(bytes) => assert_eq!(bytes, body),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_primitive() {
        match decode::<i64>(Some(br#"{"value": 42}"#), &DateStrategy::Iso8601) {
            DecodedOutcome::Primitive(v) => assert_eq!(v, 42),
            other => panic!("unexpected outcome {:?}", other),
        }
        let failed = decode::<i64>(Some(br#"{"value": "x"}"#), &DateStrategy::Iso8601);
        assert!(matches!(failed, DecodedOutcome::DecodeFailure(DecodeError::Primitive { .. })));
    }

    #[test]
    fn test_u64_max() {
        let outcome = decode::<u64>(Some(b"18446744073709551615"), &DateStrategy::Iso8601);
        assert_eq!(outcome.into_result().unwrap(), u64::MAX);
    }

    #[test]
    fn test_structured() {
        let body = br#"{"id": 7, "name": "ada"}"#;
        let account = decode::<Json<Account>>(Some(body), &DateStrategy::Iso8601)
            .into_result()
            .unwrap();
        assert_eq!(account.name, "ada");

        let bad = decode::<Json<Account>>(Some(br#"{"id": "seven"}"#), &DateStrategy::Iso8601);
        assert!(matches!(bad, DecodedOutcome::DecodeFailure(DecodeError::Json(_))));
    }

    #[test]
    fn test_structured_uses_date_strategy() {
        let body = br#"{"at": 60}"#;
        let stamp = decode::<Json<Stamp>>(Some(body), &DateStrategy::SecondsSince1970)
            .into_result()
            .unwrap();
        assert_eq!(stamp.at.timestamp(), 60);
        assert!(decode::<Json<Stamp>>(Some(body), &DateStrategy::Iso8601).is_failure());
    }

    #[test]
    fn test_missing_body() {
        let outcome = decode::<String>(None, &DateStrategy::Iso8601);
        assert!(matches!(outcome, DecodedOutcome::DecodeFailure(DecodeError::MissingBody)));
    }
}
