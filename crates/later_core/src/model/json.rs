//! Tolerant JSON field helpers.
//!
//! # Responsibility
//! - Coerce loosely-typed backend payload fields into model field types.
//! - Provide serde `deserialize_with`/`serialize_with` adapters.
//!
//! # Invariants
//! - Field adapters never fail: null, missing, or mistyped input yields the
//!   field's default.
//! - Timestamps are written as RFC 3339 UTC with full sub-second precision,
//!   so parse(write(t)) == t.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};

/// Parses a whole record, treating a non-object payload as `{}`.
pub(crate) fn parse_record<T: DeserializeOwned>(value: &Value, fallback: impl FnOnce() -> T) -> T {
    let empty = Value::Object(Map::new());
    let source = if value.is_object() { value } else { &empty };
    T::deserialize(source).unwrap_or_else(|_| fallback())
}

pub(crate) fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|n| n != 0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts RFC 3339, naive ISO-8601 (read as UTC), or epoch milliseconds.
pub(crate) fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            DateTime::parse_from_rfc3339(text)
                .map(|parsed| parsed.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
                        .ok()
                        .map(|naive| naive.and_utc())
                })
        }
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_string(&value).unwrap_or_default())
}

pub(crate) fn lenient_opt_string<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_string(&value))
}

pub(crate) fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_bool(&value).unwrap_or(false))
}

pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_i64(&value).unwrap_or(0))
}

/// Keeps string elements (and stringifiable scalars); drops the rest.
pub(crate) fn lenient_string_list<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(coerce_string).collect(),
        _ => Vec::new(),
    })
}

pub(crate) fn lenient_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<DateTime<Utc>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_timestamp(&value).unwrap_or_else(Utc::now))
}

pub(crate) fn lenient_opt_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_timestamp(&value))
}

pub(crate) fn timestamp<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(value))
}

pub(crate) fn opt_timestamp<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => s.serialize_str(&format_timestamp(value)),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce_bool, coerce_i64, coerce_timestamp, format_timestamp};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn timestamp_format_roundtrips_sub_second_precision() {
        let original = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let text = format_timestamp(&original);
        assert_eq!(coerce_timestamp(&json!(text)), Some(original));
    }

    #[test]
    fn timestamp_accepts_postgres_style_offsets_and_epoch_millis() {
        let parsed = coerce_timestamp(&json!("2024-03-01T10:00:00.5+00:00")).unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_709_287_200_500);
        let from_millis = coerce_timestamp(&json!(1_709_287_200_500_i64)).unwrap();
        assert_eq!(from_millis, parsed);
        let naive = coerce_timestamp(&json!("2024-03-01T10:00:00.5")).unwrap();
        assert_eq!(naive, parsed);
    }

    #[test]
    fn scalar_coercions_tolerate_strings() {
        assert_eq!(coerce_i64(&json!("42")), Some(42));
        assert_eq!(coerce_i64(&json!(3.9)), Some(3));
        assert_eq!(coerce_bool(&json!(1)), Some(true));
        assert_eq!(coerce_bool(&json!("nope")), None);
    }
}
