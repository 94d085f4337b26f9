//! Complex number coercion.

use super::{format_float, to_float64, CoercionError, Result};
use crate::value::{Complex128, Complex64, Value};

/// Parses a complex literal.
///
/// Accepted forms: `a`, `bi`, `a+bi`, `a-bi` (with `j` allowed in place of
/// `i`), bare `i`, `+i`, `-i`, optionally wrapped in parentheses.
pub fn parse_complex(input: &str) -> Result<Complex128> {
    const TO: &str = "complex128";
    let invalid = || CoercionError::invalid_format("string", input, TO);

    let mut s = input.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        s = inner.trim();
    }
    if s.is_empty() {
        return Err(CoercionError::EmptyInput { from: "string", to: TO });
    }

    let Some(body) = s.strip_suffix('i').or_else(|| s.strip_suffix('j')) else {
        let re = s.parse::<f64>().map_err(|_| invalid())?;
        return Ok(Complex128::new(re, 0.0));
    };

    // The real/imaginary split is the last sign that is not part of an exponent.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

    let (re_part, im_part) = match split {
        Some(i) => (&body[..i], &body[i..]),
        None => ("", body),
    };

    let re = if re_part.is_empty() {
        0.0
    } else {
        re_part.parse::<f64>().map_err(|_| invalid())?
    };
    let im = match im_part {
        "" | "+" => 1.0,
        "-" => -1.0,
        digits => digits.parse::<f64>().map_err(|_| invalid())?,
    };
    Ok(Complex128::new(re, im))
}

/// Converts to a `complex128`. Real numbers get a zero imaginary part.
pub fn to_complex128(value: &Value) -> Result<Complex128> {
    const TO: &str = "complex128";
    match value {
        Value::Nil | Value::Ptr(None) => Err(CoercionError::NilPointer { to: TO }),
        Value::Ptr(Some(inner)) => to_complex128(inner),
        Value::Complex128(c) => Ok(*c),
        Value::Complex64(c) => Ok(Complex128::new(f64::from(c.re), f64::from(c.im))),
        Value::String(s) => parse_complex(s),
        Value::Int(_) | Value::Uint(_) | Value::BigInt(_) | Value::Float(_) | Value::Float32(_) => {
            Ok(Complex128::new(to_float64(value)?, 0.0))
        }
        other => Err(CoercionError::unsupported(other, TO)),
    }
}

/// Converts to a `complex64`; either component exceeding `f32` range overflows.
pub fn to_complex64(value: &Value) -> Result<Complex64> {
    const TO: &str = "complex64";
    let c = to_complex128(value).map_err(|e| match e {
        CoercionError::NilPointer { .. } => CoercionError::NilPointer { to: TO },
        CoercionError::UnsupportedConversion { from, .. } => {
            CoercionError::UnsupportedConversion { from, to: TO }
        }
        other => other,
    })?;

    for part in [c.re, c.im] {
        if part.is_finite() && part.abs() > f64::from(f32::MAX) {
            return Err(CoercionError::overflow(
                value.indirect().map_or("nil", Value::type_name),
                format_float(part),
                TO,
            ));
        }
    }
    Ok(Complex64::new(c.re as f32, c.im as f32))
}
