// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary normalization for backend telemetry payloads.
//!
//! The backend delivers metric values either as bare numbers or wrapped as
//! `{ "value": n }`, timestamps as RFC 3339 strings or epoch milliseconds, and
//! alert counts as numbers or lists. Everything here folds those shapes into
//! one canonical representation. Unexpected shapes collapse to the zero value
//! instead of producing an error.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Normalizes a metric value to a plain `f64`.
///
/// Accepts a JSON number, a numeric string, or an object whose `value` field
/// is one of those. Anything else (null, booleans, arrays, objects without a
/// usable `value`, non-finite numbers) yields `0.0`.
pub fn normalize_metric(value: &Value) -> f64 {
    match value {
        Value::Object(map) => map.get("value").map(scalar_metric).unwrap_or(0.0),
        other => scalar_metric(other),
    }
}

fn scalar_metric(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Normalizes an open-alert field to a count.
///
/// A list counts its elements; numbers (bare or wrapped) are truncated
/// towards zero and clamped to the `u32` range.
pub fn normalize_alert_count(value: &Value) -> u32 {
    match value {
        Value::Array(items) => u32::try_from(items.len()).unwrap_or(u32::MAX),
        other => {
            let n = normalize_metric(other);
            if n <= 0.0 {
                0
            } else if n >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                n as u32
            }
        }
    }
}

/// Normalizes a timestamp field.
///
/// RFC 3339 strings, naive ISO-8601 strings (read as UTC), epoch
/// milliseconds, and Mongo-style `{ "$date": ... }` wrappers are accepted.
pub fn normalize_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => map.get("$date").and_then(normalize_timestamp),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Normalizes an identifier that may be a string, a number, or an
/// `{ "$oid": ... }` wrapper.
pub fn normalize_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(normalize_id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn bare_and_wrapped_metrics_agree() {
        assert_eq!(normalize_metric(&json!(41.5)), 41.5);
        assert_eq!(normalize_metric(&json!({"value": 41.5})), 41.5);
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(normalize_metric(&json!("12.25")), 12.25);
        assert_eq!(normalize_metric(&json!({"value": " 7 "})), 7.0);
    }

    #[test]
    fn unexpected_shapes_become_zero() {
        assert_eq!(normalize_metric(&Value::Null), 0.0);
        assert_eq!(normalize_metric(&json!(true)), 0.0);
        assert_eq!(normalize_metric(&json!([1, 2])), 0.0);
        assert_eq!(normalize_metric(&json!({"unit": "C"})), 0.0);
        assert_eq!(normalize_metric(&json!({"value": null})), 0.0);
        assert_eq!(normalize_metric(&json!("warm")), 0.0);
    }

    #[test]
    fn alert_count_accepts_lists_and_numbers() {
        assert_eq!(normalize_alert_count(&json!([{"id": 1}, {"id": 2}])), 2);
        assert_eq!(normalize_alert_count(&json!(3)), 3);
        assert_eq!(normalize_alert_count(&json!({"value": 4})), 4);
        assert_eq!(normalize_alert_count(&json!(-2)), 0);
        assert_eq!(normalize_alert_count(&Value::Null), 0);
    }

    #[test]
    fn timestamps_from_strings_and_millis() {
        let expected = DateTime::parse_from_rfc3339("2025-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            normalize_timestamp(&json!("2025-03-01T10:00:00Z")),
            Some(expected)
        );
        assert_eq!(
            normalize_timestamp(&json!("2025-03-01T10:00:00.000")),
            Some(expected)
        );
        assert_eq!(
            normalize_timestamp(&json!(expected.timestamp_millis())),
            Some(expected)
        );
        assert_eq!(
            normalize_timestamp(&json!({"$date": "2025-03-01T10:00:00Z"})),
            Some(expected)
        );
        assert_eq!(normalize_timestamp(&json!("yesterday")), None);
        assert_eq!(normalize_timestamp(&Value::Null), None);
    }

    #[test]
    fn ids_from_strings_numbers_and_oids() {
        assert_eq!(normalize_id(&json!("esp32")), Some("esp32".into()));
        assert_eq!(normalize_id(&json!(42)), Some("42".into()));
        assert_eq!(
            normalize_id(&json!({"$oid": "65f1c0ffee"})),
            Some("65f1c0ffee".into())
        );
        assert_eq!(normalize_id(&json!("  ")), None);
    }

    proptest! {
        #[test]
        fn wrapping_never_changes_the_value(v in -1.0e9f64..1.0e9f64) {
            let bare = normalize_metric(&json!(v));
            let wrapped = normalize_metric(&json!({"value": v}));
            prop_assert_eq!(bare, wrapped);
            prop_assert_eq!(bare, v);
        }

        #[test]
        fn normalization_is_always_finite(s in ".*") {
            prop_assert!(normalize_metric(&json!(s)).is_finite());
        }
    }
}
