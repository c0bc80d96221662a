//! crates/essay_review_core/src/domain.rs
//!
//! Defines the core data structures for stored submissions and the policy
//! used to order them. A submission's payload is kept as the raw JSON text the
//! store returned; only the timestamp fields are ever looked at.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::cmp::Reverse;
use tracing::debug;

/// Sentinel used when a record carries no usable timestamp. Sorts last.
pub const EARLIEST: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

/// Recognised timestamp fields, highest priority first.
const TIMESTAMP_FIELDS: [&str; 3] = ["serverTimestamp", "submittedAt", "timestamp"];

/// Offset-carrying layouts tried after RFC 3339. `%#z` takes `Z`, `+hh`,
/// `+hhmm` and `+hh:mm`; `%.f` also matches an absent fraction.
const OFFSET_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
];

/// Naive layouts, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single student submission as held by the blob store.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    /// Store-assigned identifier; used for fetching only.
    pub key: String,
    payload: Box<RawValue>,
}

impl SubmissionRecord {
    pub fn new(key: impl Into<String>, payload: Box<RawValue>) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    /// The stored JSON document, untouched.
    pub fn payload(&self) -> &RawValue {
        &self.payload
    }

    pub fn into_payload(self) -> Box<RawValue> {
        self.payload
    }
}

/// Selects the instant a record is ordered by.
///
/// The first present field of `serverTimestamp`, `submittedAt`, `timestamp`
/// wins; `null` and blank strings count as absent. A present value that does
/// not parse yields [`EARLIEST`] rather than falling through to the next field.
pub fn effective_timestamp(record: &SubmissionRecord) -> DateTime<Utc> {
    // A repeated key keeps its last value.
    let fields: Map<String, Value> = match serde_json::from_str(record.payload.get()) {
        Ok(fields) => fields,
        Err(e) => {
            debug!(key = %record.key, "Submission is not a JSON object, ordering it last: {}", e);
            return EARLIEST;
        }
    };

    TIMESTAMP_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name))
        .find(|value| !is_blank(value))
        .and_then(parse_timestamp)
        .unwrap_or(EARLIEST)
}

/// Orders records newest first. Ties keep no guaranteed relative order.
pub fn sort_newest_first(records: &mut [SubmissionRecord]) {
    records.sort_by_cached_key(|record| Reverse(effective_timestamp(record)));
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_text(text.trim()),
        // Numbers are milliseconds since the Unix epoch.
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(key: &str, json: &str) -> SubmissionRecord {
        SubmissionRecord::new(key, RawValue::from_string(json.to_string()).unwrap())
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn server_timestamp_takes_priority() {
        let r = record(
            "a",
            r#"{"timestamp":"2020-01-01T00:00:00Z","submittedAt":"2021-01-01T00:00:00Z","serverTimestamp":"2022-01-01T00:00:00Z"}"#,
        );
        assert_eq!(effective_timestamp(&r), utc(2022, 1, 1));
    }

    #[test]
    fn falls_back_through_submitted_at_then_timestamp() {
        let submitted = record("a", r#"{"submittedAt":"2024-01-01T00:00:00Z","timestamp":"2019-01-01T00:00:00Z"}"#);
        assert_eq!(effective_timestamp(&submitted), utc(2024, 1, 1));

        let legacy = record("b", r#"{"serverTimestamp":null,"timestamp":"2024-06-01T00:00:00Z"}"#);
        assert_eq!(effective_timestamp(&legacy), utc(2024, 6, 1));
    }

    #[test]
    fn blank_string_counts_as_absent() {
        let r = record("a", r#"{"serverTimestamp":"  ","submittedAt":"2024-03-05"}"#);
        assert_eq!(effective_timestamp(&r), utc(2024, 3, 5));
    }

    #[test]
    fn missing_fields_yield_sentinel() {
        let r = record("a", r#"{"studentName":"Ada","essayId":"persuasive"}"#);
        assert_eq!(effective_timestamp(&r), EARLIEST);
    }

    #[test]
    fn unparseable_value_yields_sentinel_without_fallthrough() {
        let r = record("a", r#"{"serverTimestamp":"not a date","timestamp":"2024-06-01T00:00:00Z"}"#);
        assert_eq!(effective_timestamp(&r), EARLIEST);
    }

    #[test]
    fn non_object_payload_yields_sentinel() {
        assert_eq!(effective_timestamp(&record("a", "[1,2,3]")), EARLIEST);
        assert_eq!(effective_timestamp(&record("b", "\"2024-01-01\"")), EARLIEST);
    }

    #[test]
    fn numeric_values_are_epoch_millis() {
        let r = record("a", r#"{"timestamp":1717200000000}"#);
        assert_eq!(effective_timestamp(&r), utc(2024, 6, 1));
    }

    #[test]
    fn offsets_and_naive_layouts_parse() {
        let offset = record("a", r#"{"submittedAt":"2024-06-01T02:00:00+02:00"}"#);
        assert_eq!(effective_timestamp(&offset), utc(2024, 6, 1));

        let naive = record("b", r#"{"submittedAt":"2024-06-01T00:00:00.250"}"#);
        assert_eq!(
            effective_timestamp(&naive),
            utc(2024, 6, 1) + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn minute_precision_and_basic_offsets_parse() {
        let minutes_zulu = record("a", r#"{"submittedAt":"2024-06-01T00:00Z"}"#);
        assert_eq!(effective_timestamp(&minutes_zulu), utc(2024, 6, 1));

        let basic_offset = record("b", r#"{"submittedAt":"2024-06-01T00:00:00+0000"}"#);
        assert_eq!(effective_timestamp(&basic_offset), utc(2024, 6, 1));

        let fractional_basic = record("c", r#"{"submittedAt":"2024-06-01T02:00:00.500+0200"}"#);
        assert_eq!(
            effective_timestamp(&fractional_basic),
            utc(2024, 6, 1) + chrono::Duration::milliseconds(500)
        );

        let minutes_offset = record("d", r#"{"submittedAt":"2024-06-01T01:00+01:00"}"#);
        assert_eq!(effective_timestamp(&minutes_offset), utc(2024, 6, 1));

        let spaced_offset = record("e", r#"{"submittedAt":"2024-06-01 00:00:00Z"}"#);
        assert_eq!(effective_timestamp(&spaced_offset), utc(2024, 6, 1));
    }

    #[test]
    fn naive_minute_precision_is_utc() {
        let t = record("a", r#"{"timestamp":"2024-06-01T00:00"}"#);
        assert_eq!(effective_timestamp(&t), utc(2024, 6, 1));

        let spaced = record("b", r#"{"timestamp":"2024-06-01 00:00"}"#);
        assert_eq!(effective_timestamp(&spaced), utc(2024, 6, 1));
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let r = record("a", r#"{"timestamp":"a","timestamp":"2024-06-01T00:00:00Z"}"#);
        assert_eq!(effective_timestamp(&r), utc(2024, 6, 1));
    }

    #[test]
    fn sorts_newest_first_regardless_of_input_order() {
        let mut records = vec![
            record("t3", r#"{"timestamp":"2023-01-01T00:00:00Z"}"#),
            record("none", r#"{"essayId":"x"}"#),
            record("t1", r#"{"serverTimestamp":"2025-01-01T00:00:00Z"}"#),
            record("t2", r#"{"submittedAt":"2024-01-01T00:00:00Z"}"#),
        ];
        sort_newest_first(&mut records);
        let keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["t1", "t2", "t3", "none"]);
    }

    #[test]
    fn payload_is_preserved_verbatim() {
        let json = r#"{ "b": 1.50, "a": "x" }"#;
        let r = record("k", json);
        assert_eq!(r.payload().get(), json);
    }
}
