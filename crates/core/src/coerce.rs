//! Driver-boundary numeric coercion.
//!
//! Relational drivers hand back aggregate columns in inconvenient shapes:
//! `SUM`/`AVG` arrive as `NUMERIC` (decimal), `COUNT` as nullable `BIGINT`,
//! and JSON payloads from older tooling sometimes carry numbers as strings.
//! All of that is normalized here, once, when rows and payloads are
//! materialized into domain structs. Business logic never sees a stringly
//! number or a `NULL` count.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};

/// Coerce an optional decimal aggregate to `i64`, defaulting to 0.
///
/// Fractional values round half away from zero; values outside the `i64`
/// range clamp to 0 (they can only arise from corrupt data).
#[must_use]
pub fn decimal_to_i64(value: Option<Decimal>) -> i64 {
    value
        .map(|d| {
            d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

/// Coerce an optional decimal aggregate to `i64`, preserving absence.
///
/// Used where a missing row (LEFT JOIN null) means something different from
/// zero and must stay `None`.
#[must_use]
pub fn decimal_to_opt_i64(value: Option<Decimal>) -> Option<i64> {
    value.map(|d| {
        d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0)
    })
}

/// Coerce an optional decimal aggregate to `f64`, defaulting to 0.0.
#[must_use]
pub fn decimal_to_f64(value: Option<Decimal>) -> f64 {
    value.and_then(|d| d.to_f64()).unwrap_or(0.0)
}

/// Coerce a nullable count column to `i64`, defaulting to 0.
#[must_use]
pub fn count(value: Option<i64>) -> i64 {
    value.unwrap_or(0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    #[allow(clippy::cast_possible_truncation)] // float inputs are counts/cents, far below 2^52
    fn into_i64(self) -> i64 {
        match self {
            Self::Int(i) => i,
            Self::Float(f) => f as i64,
            Self::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(0)
            }
        }
    }
}

/// Deserialize an integer field leniently: accepts numbers, numeric strings,
/// floats, and null/missing (all of which default to 0).
///
/// Use with `#[serde(default, deserialize_with = "coerce::lenient_i64")]` so
/// a missing key also defaults.
///
/// # Errors
///
/// Returns an error only for structurally invalid input (arrays, objects).
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(value.map(LenientNumber::into_i64).unwrap_or(0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "lenient_i64")]
        value: i64,
    }

    fn parse(json: &str) -> i64 {
        serde_json::from_str::<Payload>(json).unwrap().value
    }

    #[test]
    fn test_lenient_i64_number() {
        assert_eq!(parse(r#"{"value": 42}"#), 42);
    }

    #[test]
    fn test_lenient_i64_string() {
        assert_eq!(parse(r#"{"value": "42"}"#), 42);
        assert_eq!(parse(r#"{"value": " 42 "}"#), 42);
    }

    #[test]
    fn test_lenient_i64_decimal_string() {
        assert_eq!(parse(r#"{"value": "42.75"}"#), 42);
    }

    #[test]
    fn test_lenient_i64_null_and_missing() {
        assert_eq!(parse(r#"{"value": null}"#), 0);
        assert_eq!(parse(r"{}"), 0);
    }

    #[test]
    fn test_lenient_i64_garbage_string_defaults_to_zero() {
        assert_eq!(parse(r#"{"value": "not a number"}"#), 0);
    }

    #[test]
    fn test_lenient_i64_negative() {
        assert_eq!(parse(r#"{"value": "-3"}"#), -3);
    }

    #[test]
    fn test_decimal_to_i64() {
        assert_eq!(decimal_to_i64(None), 0);
        assert_eq!(decimal_to_i64(Some(Decimal::new(1250, 2))), 13); // 12.50 rounds up
        assert_eq!(decimal_to_i64(Some(Decimal::from(-4))), -4);
    }

    #[test]
    fn test_decimal_to_f64() {
        assert!((decimal_to_f64(None) - 0.0).abs() < f64::EPSILON);
        let v = decimal_to_f64(Some(Decimal::new(15, 1))); // 1.5
        assert!((v - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_count_defaults() {
        assert_eq!(count(None), 0);
        assert_eq!(count(Some(9)), 9);
    }
}
