//! Polars `AnyValue` helpers used when turning frames into transport values.
//!
//! Frames built from Dataset-JSON only hold `String`, `Int64`, `Float64` and
//! `Boolean` columns.

use polars::prelude::AnyValue;

/// Text of a character cell. `Null` becomes the empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Numeric value of a cell; booleans map to 1/0, everything else to `None`.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::Float64(v) => Some(v),
        AnyValue::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::String("001")), "001");
        assert_eq!(any_to_string(AnyValue::StringOwned("002".into())), "002");
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Int64(3)), Some(3.0));
        assert_eq!(any_to_f64(AnyValue::Float64(2.5)), Some(2.5));
        assert_eq!(any_to_f64(AnyValue::Boolean(false)), Some(0.0));
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::String("1")), None);
    }
}
