//! IBM System/360 floating point conversion.
//!
//! Transport files store numbers as big-endian IBM hexadecimal floats:
//! one sign bit, a 7-bit excess-64 base-16 exponent and a 56-bit
//! fraction. Any IEEE double inside the IBM range converts exactly.
//! Magnitudes above the range saturate to the largest IBM value and
//! magnitudes below it become zero.
//!
//! Missing values share the representation: a first byte of `.`, `_`
//! or `A`-`Z` followed by seven zero bytes.

use crate::types::{MissingValue, NumericValue};

const SIGN_MASK: u8 = 0x80;
const IBM_EXP_BIAS: i32 = 64;
const IBM_MAX_EXP: i32 = 127;
const FRACTION_BITS: i32 = 56;
const FRACTION_MASK: u64 = (1 << 56) - 1;

/// Encode a finite IEEE double as an IBM float.
///
/// Non-finite input is encoded as the standard missing value.
#[must_use]
pub fn ieee_to_ibm(value: f64) -> [u8; 8] {
    if !value.is_finite() {
        return encode_missing(MissingValue::Standard);
    }
    if value == 0.0 {
        return [0; 8];
    }

    let bits = value.to_bits();
    let sign = if bits >> 63 == 1 { SIGN_MASK } else { 0 };
    let biased = ((bits >> 52) & 0x7ff) as i32;
    if biased == 0 {
        // Subnormal doubles are far below the smallest IBM magnitude.
        return [0; 8];
    }

    // value = (mantissa / 2^53) * 2^power, with mantissa in [2^52, 2^53)
    let mantissa = (bits & ((1 << 52) - 1)) | (1 << 52);
    let power = biased - 1022;

    // Choose the base-16 exponent so the fraction lands in [1/16, 1).
    let exponent = (power + 3).div_euclid(4);
    let shift = 4 * exponent - power;
    let fraction = mantissa << (3 - shift);

    let biased_exp = exponent + IBM_EXP_BIAS;
    if biased_exp > IBM_MAX_EXP {
        let mut out = [0xff; 8];
        out[0] = sign | 0x7f;
        return out;
    }
    if biased_exp < 0 {
        return [0; 8];
    }

    let mut out = fraction.to_be_bytes();
    out[0] = sign | biased_exp as u8;
    out
}

/// Decode an IBM float. Missing values decode as `NaN`; use
/// [`decode_numeric`] to keep the missing code.
#[must_use]
pub fn ibm_to_ieee(bytes: [u8; 8]) -> f64 {
    if is_missing(&bytes).is_some() {
        return f64::NAN;
    }

    let fraction = u64::from_be_bytes(bytes) & FRACTION_MASK;
    if fraction == 0 {
        return 0.0;
    }

    let exponent = i32::from(bytes[0] & 0x7f) - IBM_EXP_BIAS;
    let magnitude = fraction as f64 * 2f64.powi(4 * exponent - FRACTION_BITS);
    if bytes[0] & SIGN_MASK == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// The missing code carried by `bytes`, if any.
#[must_use]
pub fn is_missing(bytes: &[u8]) -> Option<MissingValue> {
    let (&first, rest) = bytes.split_first()?;
    if rest.iter().any(|&b| b != 0) {
        return None;
    }
    MissingValue::from_byte(first)
}

#[must_use]
pub fn encode_missing(missing: MissingValue) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[0] = missing.to_byte();
    out
}

/// Decode a numeric field of 1 to 8 bytes.
///
/// Short fields hold the leading bytes of the full value; the dropped
/// low-order fraction bytes are zero.
#[must_use]
pub fn decode_numeric(bytes: &[u8]) -> NumericValue {
    if let Some(missing) = is_missing(bytes) {
        return NumericValue::Missing(missing);
    }
    let mut full = [0u8; 8];
    let len = bytes.len().min(8);
    full[..len].copy_from_slice(&bytes[..len]);
    NumericValue::Value(ibm_to_ieee(full))
}

/// Encode a numeric value into 8 bytes.
#[must_use]
pub fn encode_numeric(value: &NumericValue, default_missing: MissingValue) -> [u8; 8] {
    match value {
        NumericValue::Value(v) if v.is_finite() => ieee_to_ibm(*v),
        NumericValue::Value(_) => encode_missing(default_missing),
        NumericValue::Missing(m) => encode_missing(*m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_encodings() {
        assert_eq!(ieee_to_ibm(1.0), [0x41, 0x10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(-1.0), [0xC1, 0x10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(0.5), [0x40, 0x80, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(100.0), [0x42, 0x64, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(0.0), [0; 8]);
        assert_eq!(ieee_to_ibm(-0.0), [0; 8]);
    }

    #[test]
    fn test_known_decodings() {
        assert_eq!(ibm_to_ieee([0x41, 0x10, 0, 0, 0, 0, 0, 0]), 1.0);
        assert_eq!(ibm_to_ieee([0xC2, 0x64, 0, 0, 0, 0, 0, 0]), -100.0);
        assert_eq!(ibm_to_ieee([0; 8]), 0.0);
        assert!(ibm_to_ieee(encode_missing(MissingValue::Standard)).is_nan());
    }

    #[test]
    fn test_out_of_range() {
        let max = ieee_to_ibm(f64::MAX);
        assert_eq!(max, [0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(ieee_to_ibm(-f64::MAX)[0], 0xFF);
        assert_eq!(ieee_to_ibm(1e-300), [0; 8]);
        assert_eq!(ieee_to_ibm(f64::MIN_POSITIVE / 4.0), [0; 8]);
    }

    #[test]
    fn test_missing_codes() {
        for code in [
            MissingValue::Standard,
            MissingValue::Underscore,
            MissingValue::Special('A'),
            MissingValue::Special('Z'),
        ] {
            let bytes = encode_missing(code);
            assert_eq!(is_missing(&bytes), Some(code));
            assert_eq!(decode_numeric(&bytes), NumericValue::Missing(code));
        }
        assert_eq!(is_missing(&ieee_to_ibm(1.0)), None);
        assert_eq!(is_missing(&[0; 8]), None);
    }

    #[test]
    fn test_encode_numeric_non_finite() {
        let nan = NumericValue::Value(f64::NAN);
        assert_eq!(
            encode_numeric(&nan, MissingValue::Special('N')),
            encode_missing(MissingValue::Special('N'))
        );
    }

    #[test]
    fn test_short_numeric_field() {
        let full = ieee_to_ibm(2.5);
        assert_eq!(decode_numeric(&full[..4]), NumericValue::Value(2.5));
    }

    proptest! {
        #[test]
        fn prop_exact_in_range(v in -1e70f64..1e70f64) {
            prop_assume!(v == 0.0 || v.abs() > 1e-70);
            prop_assert_eq!(ibm_to_ieee(ieee_to_ibm(v)), v);
        }

        #[test]
        fn prop_integers_exact(v in any::<i32>()) {
            prop_assert_eq!(ibm_to_ieee(ieee_to_ibm(f64::from(v))), f64::from(v));
        }
    }
}
