//! Coercion kernel.
//!
//! Converts a dynamically-typed [`Value`] into a concrete primitive, with a
//! typed error for every way the conversion can fail. Numeric conversions
//! funnel through a single 128-bit integer path and a single `f64` path; the
//! generic [`to_integer`] and [`to_float`] then range-check against the
//! target type's bounds.
//!
//! Validators never surface these errors. They call the kernel and treat any
//! error as a failed check.

mod complex;
mod literal;
mod numeric;

pub use complex::{parse_complex, to_complex128, to_complex64};
pub use literal::{parse_go_bool, to_literal};
pub use numeric::{to_float, to_integer};

use crate::value::Value;
use chrono::SecondsFormat;
use thiserror::Error;

/// Result type alias for coercion.
pub type Result<T, E = CoercionError> = std::result::Result<T, E>;

/// Why a value could not be converted.
///
/// Every variant names the target type; variants about a specific input also
/// carry the source kind and a rendering of the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: &'static str, to: &'static str },

    #[error("cannot convert nil pointer to {to}")]
    NilPointer { to: &'static str },

    #[error("cannot parse {value:?} ({from}) as {to}")]
    InvalidFormat {
        from: &'static str,
        value: String,
        to: &'static str,
    },

    #[error("cannot convert empty {from} to {to}")]
    EmptyInput { from: &'static str, to: &'static str },

    #[error("value {value} ({from}) overflows {to}")]
    Overflow {
        from: &'static str,
        value: String,
        to: &'static str,
    },

    #[error("cannot convert negative value {value} ({from}) to unsigned {to}")]
    NegativeToUnsigned {
        from: &'static str,
        value: String,
        to: &'static str,
    },

    #[error("value {value} ({from}) is not a whole number; cannot convert to {to}")]
    NotWholeNumber {
        from: &'static str,
        value: String,
        to: &'static str,
    },
}

impl CoercionError {
    pub(crate) fn unsupported(value: &Value, to: &'static str) -> Self {
        Self::UnsupportedConversion {
            from: value.type_name(),
            to,
        }
    }

    pub(crate) fn invalid_format(from: &'static str, value: impl ToString, to: &'static str) -> Self {
        Self::InvalidFormat {
            from,
            value: value.to_string(),
            to,
        }
    }

    pub(crate) fn overflow(from: &'static str, value: impl ToString, to: &'static str) -> Self {
        Self::Overflow {
            from,
            value: value.to_string(),
            to,
        }
    }
}

// ============================================================================
// Bool / String
// ============================================================================

/// Converts to `bool`.
///
/// Strings are trimmed and case-folded: `true 1 yes on y` are true and
/// `false 0 no off n` and the empty string are false. Numbers are true when
/// non-zero.
pub fn to_bool(value: &Value) -> Result<bool> {
    const TO: &str = "bool";
    match value {
        Value::Nil | Value::Ptr(None) => Err(CoercionError::NilPointer { to: TO }),
        Value::Ptr(Some(inner)) => to_bool(inner),
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Uint(u) => Ok(*u != 0),
        Value::BigInt(i) => Ok(*i != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Float32(f) => Ok(*f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "y" => Ok(true),
            "false" | "0" | "no" | "off" | "n" | "" => Ok(false),
            _ => Err(CoercionError::invalid_format("string", s, TO)),
        },
        other => Err(CoercionError::unsupported(other, TO)),
    }
}

/// Formats a float the way Go's `strconv.FormatFloat(f, 'g', -1, 64)` would
/// for finite values in plain notation: the shortest string that round-trips.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() && f > 0.0 {
        "+Inf".to_string()
    } else if f.is_infinite() {
        "-Inf".to_string()
    } else {
        f.to_string()
    }
}

/// Converts to a string using canonical representations.
///
/// Byte slices must be valid UTF-8; times render as RFC 3339 with their
/// offset (`Z` for UTC).
pub fn to_string(value: &Value) -> Result<String> {
    const TO: &str = "string";
    match value {
        Value::Nil | Value::Ptr(None) => Err(CoercionError::NilPointer { to: TO }),
        Value::Ptr(Some(inner)) => to_string(inner),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Uint(u) => Ok(u.to_string()),
        Value::BigInt(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(format_float(*f)),
        Value::Float32(f) => Ok(if f.is_finite() {
            f.to_string()
        } else {
            format_float(f64::from(*f))
        }),
        Value::Complex128(c) => Ok(c.to_string()),
        Value::Complex64(c) => Ok(crate::value::Complex128::new(f64::from(c.re), f64::from(c.im)).to_string()),
        Value::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|_| {
            CoercionError::invalid_format("[]byte", String::from_utf8_lossy(bytes), TO)
        }),
        Value::Time(t) => Ok(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        other => Err(CoercionError::unsupported(other, TO)),
    }
}

// ============================================================================
// Integer / float paths
// ============================================================================

/// Narrows a float to an integer if it is finite and whole.
fn whole_float(f: f64, from: &'static str, to: &'static str) -> Result<i128> {
    if f.is_nan() {
        return Err(CoercionError::invalid_format(from, format_float(f), to));
    }
    if f.is_infinite() || f.abs() >= 2f64.powi(127) {
        return Err(CoercionError::overflow(from, format_float(f), to));
    }
    if f.fract() != 0.0 {
        return Err(CoercionError::NotWholeNumber {
            from,
            value: format_float(f),
            to,
        });
    }
    Ok(f as i128)
}

/// The shared integer path. Empty strings are zero; numeric strings may be
/// written as floats as long as they are whole.
pub(crate) fn to_i128(value: &Value, to: &'static str) -> Result<i128> {
    match value {
        Value::Nil | Value::Ptr(None) => Err(CoercionError::NilPointer { to }),
        Value::Ptr(Some(inner)) => to_i128(inner, to),
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Int(i) => Ok(i128::from(*i)),
        Value::Uint(u) => Ok(i128::from(*u)),
        Value::BigInt(i) => Ok(*i),
        Value::Float(f) => whole_float(*f, "float64", to),
        Value::Float32(f) => whole_float(f64::from(*f), "float32", to),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            if let Ok(i) = trimmed.parse::<i128>() {
                return Ok(i);
            }
            match trimmed.parse::<f64>() {
                Ok(f) => whole_float(f, "string", to),
                Err(_) => Err(CoercionError::invalid_format("string", s, to)),
            }
        }
        other => Err(CoercionError::unsupported(other, to)),
    }
}

/// Converts to `i64`.
pub fn to_int64(value: &Value) -> Result<i64> {
    to_integer::<i64>(value)
}

/// Converts to `f64`. Empty strings are zero.
pub fn to_float64(value: &Value) -> Result<f64> {
    const TO: &str = "f64";
    match value {
        Value::Nil | Value::Ptr(None) => Err(CoercionError::NilPointer { to: TO }),
        Value::Ptr(Some(inner)) => to_float64(inner),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Ok(*i as f64),
        Value::Uint(u) => Ok(*u as f64),
        Value::BigInt(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::Float32(f) => Ok(f64::from(*f)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| CoercionError::invalid_format("string", s, TO))
        }
        other => Err(CoercionError::unsupported(other, TO)),
    }
}

/// Converts to a big integer (`i128`).
///
/// Strings may carry a `0x`/`0X` prefix after an optional sign. Unlike the
/// fixed-width paths, an empty string is an error.
pub fn to_big_int(value: &Value) -> Result<i128> {
    const TO: &str = "big.Int";
    match value {
        Value::Ptr(Some(inner)) => to_big_int(inner),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(CoercionError::EmptyInput { from: "string", to: TO });
            }
            let (negative, unsigned) = match trimmed.as_bytes()[0] {
                b'-' => (true, &trimmed[1..]),
                b'+' => (false, &trimmed[1..]),
                _ => (false, trimmed),
            };
            let (radix, digits) = match unsigned
                .strip_prefix("0x")
                .or_else(|| unsigned.strip_prefix("0X"))
            {
                Some(hex) => (16, hex),
                None => (10, unsigned),
            };
            // Exactly one sign, and only in front of the prefix.
            if digits.is_empty() || digits.starts_with(['+', '-']) {
                return Err(CoercionError::invalid_format("string", s, TO));
            }
            let signed = if negative {
                format!("-{digits}")
            } else {
                digits.to_string()
            };
            match i128::from_str_radix(&signed, radix) {
                Ok(n) => Ok(n),
                Err(e)
                    if matches!(
                        e.kind(),
                        std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow
                    ) =>
                {
                    Err(CoercionError::overflow("string", s, TO))
                }
                Err(_) => Err(CoercionError::invalid_format("string", s, TO)),
            }
        }
        other => to_i128(other, TO),
    }
}
