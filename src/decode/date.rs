//! Date decoding strategies.
//!
//! Serde has no deserialization context, so the strategy chosen for a
//! response is installed in a thread-local for the duration of one
//! synchronous decode. Fields opt in with
//! `#[serde(with = "response_resolver::decode::date")]` (or `date::option`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::cell::RefCell;

/// How date fields in a structured body are encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStrategy {
    /// RFC 3339 / ISO-8601 strings.
    #[default]
    Iso8601,
    /// Unix timestamp in seconds (integer or fractional).
    #[serde(rename = "seconds_since_1970")]
    SecondsSince1970,
    /// Unix timestamp in milliseconds.
    #[serde(rename = "milliseconds_since_1970")]
    MillisecondsSince1970,
    /// A chrono format string, e.g. `%Y-%m-%d %H:%M:%S`.
    Formatted(String),
}

impl DateStrategy {
    /// Pick the strategy for one request: request override, then context
    /// default, then ISO-8601.
    pub fn resolve(request: Option<&DateStrategy>, context: Option<&DateStrategy>) -> DateStrategy {
        request.or(context).cloned().unwrap_or_default()
    }

    fn parse(&self, raw: RawDate) -> Result<DateTime<Utc>, String> {
        match (self, raw) {
            (DateStrategy::Iso8601, RawDate::Text(text)) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("invalid ISO-8601 date '{}': {}", text, e)),
            (DateStrategy::SecondsSince1970, raw) => {
                let secs = raw.as_f64()?;
                let mut whole = secs.floor();
                let mut nanos = ((secs - whole) * 1e9).round();
                if nanos >= 1e9 {
                    whole += 1.0;
                    nanos -= 1e9;
                }
                Utc.timestamp_opt(whole as i64, nanos as u32)
                    .single()
                    .ok_or_else(|| format!("timestamp {} out of range", secs))
            }
            (DateStrategy::MillisecondsSince1970, raw) => {
                let millis = raw.as_f64()? as i64;
                Utc.timestamp_millis_opt(millis)
                    .single()
                    .ok_or_else(|| format!("timestamp {}ms out of range", millis))
            }
            (DateStrategy::Formatted(format), RawDate::Text(text)) => parse_formatted(&text, format),
            (strategy, raw) => Err(format!("{:?} cannot decode {:?}", strategy, raw)),
        }
    }
}

fn parse_formatted(text: &str, format: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_str(text, format) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("date '{}' does not match format '{}'", text, format))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDate {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawDate {
    fn as_f64(&self) -> Result<f64, String> {
        match self {
            RawDate::Integer(i) => Ok(*i as f64),
            RawDate::Float(f) => Ok(*f),
            RawDate::Text(t) => t
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("expected numeric timestamp, got '{}'", t)),
        }
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<DateStrategy>> = const { RefCell::new(None) };
}

struct Restore(Option<DateStrategy>);

impl Drop for Restore {
    fn drop(&mut self) {
        let previous = self.0.take();
        ACTIVE.with(|active| *active.borrow_mut() = previous);
    }
}

/// Run `f` with `strategy` as the active date strategy on this thread.
pub fn with_strategy<R>(strategy: &DateStrategy, f: impl FnOnce() -> R) -> R {
    let previous = ACTIVE.with(|active| active.replace(Some(strategy.clone())));
    let _restore = Restore(previous);
    f()
}

/// The strategy installed by `with_strategy`, ISO-8601 outside of one.
pub fn active_strategy() -> DateStrategy {
    ACTIVE.with(|active| active.borrow().clone()).unwrap_or_default()
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawDate::deserialize(deserializer)?;
    active_strategy().parse(raw).map_err(D::Error::custom)
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

/// Same as the parent module for `Option<DateTime<Utc>>` fields.
pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawDate>::deserialize(deserializer)? {
            Some(raw) => active_strategy().parse(raw).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Event {
        #[serde(with = "super")]
        at: DateTime<Utc>,
        #[serde(default, with = "super::option")]
        until: Option<DateTime<Utc>>,
    }

    fn decode(strategy: &DateStrategy, json: &str) -> Result<Event, serde_json::Error> {
        with_strategy(strategy, || serde_json::from_str(json))
    }

    #[test]
    fn test_resolution_order() {
        let request = DateStrategy::SecondsSince1970;
        let context = DateStrategy::MillisecondsSince1970;
        assert_eq!(DateStrategy::resolve(Some(&request), Some(&context)), request);
        assert_eq!(DateStrategy::resolve(None, Some(&context)), context);
        assert_eq!(DateStrategy::resolve(None, None), DateStrategy::Iso8601);
    }

    #[test]
    fn test_iso8601() {
        let event = decode(&DateStrategy::Iso8601, r#"{"at": "2024-03-01T12:00:00+02:00"}"#).unwrap();
        assert_eq!(event.at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert!(event.until.is_none());
    }

    #[test]
    fn test_timestamps() {
        let secs = decode(&DateStrategy::SecondsSince1970, r#"{"at": 86400, "until": 86400.5}"#).unwrap();
        assert_eq!(secs.at.timestamp(), 86_400);
        assert_eq!(secs.until.unwrap().timestamp_subsec_millis(), 500);

        let millis = decode(&DateStrategy::MillisecondsSince1970, r#"{"at": 1500}"#).unwrap();
        assert_eq!(millis.at.timestamp_millis(), 1_500);
    }

    #[test]
    fn test_fraction_rounding_carries_into_seconds() {
        let event = decode(&DateStrategy::SecondsSince1970, r#"{"at": 1.9999999999}"#).unwrap();
        assert_eq!(event.at.timestamp(), 2);
        assert_eq!(event.at.timestamp_subsec_nanos(), 0);

        let negative = decode(&DateStrategy::SecondsSince1970, r#"{"at": -0.0000000001}"#).unwrap();
        assert_eq!(negative.at.timestamp(), 0);
    }

    #[test]
    fn test_formatted() {
        let strategy = DateStrategy::Formatted("%Y-%m-%d".to_string());
        let event = decode(&strategy, r#"{"at": "2023-07-14"}"#).unwrap();
        assert_eq!(event.at.to_rfc3339(), "2023-07-14T00:00:00+00:00");
    }

    #[test]
    fn test_wrong_strategy_fails() {
        assert!(decode(&DateStrategy::Iso8601, r#"{"at": 86400}"#).is_err());
        assert!(decode(&DateStrategy::SecondsSince1970, r#"{"at": "yesterday"}"#).is_err());
    }

    #[test]
    fn test_strategy_restored_after_scope() {
        with_strategy(&DateStrategy::SecondsSince1970, || {
            assert_eq!(active_strategy(), DateStrategy::SecondsSince1970);
        });
        assert_eq!(active_strategy(), DateStrategy::Iso8601);
    }
}
