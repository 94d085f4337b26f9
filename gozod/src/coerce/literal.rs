//! Best-effort literal narrowing.

use crate::value::Value;

/// Parses the boolean spellings Go's `strconv.ParseBool` accepts.
pub fn parse_go_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn narrow_float(f: f64) -> Option<Value> {
    if f == 1.0 {
        Some(Value::Bool(true))
    } else if f == 0.0 {
        Some(Value::Bool(false))
    } else if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 {
        Some(Value::Int(f as i64))
    } else {
        None
    }
}

/// Narrows a value to the most specific primitive literal it can represent.
///
/// - integers `1`/`0` and floats `1.0`/`0.0` become booleans
/// - other whole floats become integers
/// - strings are tried as bool, then integer, then float
///
/// Never fails; anything else is returned unchanged.
pub fn to_literal(value: &Value) -> Value {
    match value {
        Value::Int(1) | Value::Uint(1) => Value::Bool(true),
        Value::Int(0) | Value::Uint(0) => Value::Bool(false),
        Value::Float(f) => narrow_float(*f).unwrap_or(Value::Float(*f)),
        Value::Float32(f) => narrow_float(f64::from(*f)).unwrap_or(Value::Float32(*f)),
        Value::String(s) => {
            if let Some(b) = parse_go_bool(s) {
                Value::Bool(b)
            } else if let Ok(i) = s.parse::<i64>() {
                Value::Int(i)
            } else if let Some(f) = s.parse::<f64>().ok().filter(|f| f.is_finite()) {
                Value::Float(f)
            } else {
                value.clone()
            }
        }
        other => other.clone(),
    }
}
