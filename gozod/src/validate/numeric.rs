//! Numeric ordering and divisibility.

use crate::coerce::to_float64;
use crate::value::Value;
use std::cmp::Ordering;

const MULTIPLE_OF_EPSILON: f64 = 1e-10;

fn exact_integer(value: &Value) -> Option<i128> {
    match value.indirect()? {
        Value::Int(i) => Some(i128::from(*i)),
        Value::Uint(u) => Some(i128::from(*u)),
        Value::BigInt(b) => Some(*b),
        _ => None,
    }
}

/// Orders two numeric values. Integer pairs compare exactly; anything
/// involving a float compares as `f64`. `None` for non-numeric operands and
/// NaN.
fn compare(value: &Value, limit: &Value) -> Option<Ordering> {
    if !value.is_numeric() || !limit.is_numeric() {
        return None;
    }
    match (exact_integer(value), exact_integer(limit)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => to_float64(value)
            .ok()?
            .partial_cmp(&to_float64(limit).ok()?),
    }
}

/// `value < limit`.
pub fn lt(value: &Value, limit: &Value) -> bool {
    compare(value, limit) == Some(Ordering::Less)
}

/// `value <= limit`.
pub fn lte(value: &Value, limit: &Value) -> bool {
    matches!(compare(value, limit), Some(Ordering::Less | Ordering::Equal))
}

/// `value > limit`.
pub fn gt(value: &Value, limit: &Value) -> bool {
    compare(value, limit) == Some(Ordering::Greater)
}

/// `value >= limit`.
pub fn gte(value: &Value, limit: &Value) -> bool {
    matches!(
        compare(value, limit),
        Some(Ordering::Greater | Ordering::Equal)
    )
}

pub fn positive(value: &Value) -> bool {
    gt(value, &Value::Int(0))
}

pub fn negative(value: &Value) -> bool {
    lt(value, &Value::Int(0))
}

pub fn non_positive(value: &Value) -> bool {
    lte(value, &Value::Int(0))
}

pub fn non_negative(value: &Value) -> bool {
    gte(value, &Value::Int(0))
}

/// Whether `value` is a multiple of `divisor`, within `1e-10`.
///
/// A zero divisor always fails.
pub fn multiple_of(value: &Value, divisor: &Value) -> bool {
    if !value.is_numeric() || !divisor.is_numeric() {
        return false;
    }
    if let (Some(v), Some(d)) = (exact_integer(value), exact_integer(divisor)) {
        return d != 0 && v.checked_rem(d).map_or(true, |r| r == 0);
    }
    match (to_float64(value), to_float64(divisor)) {
        (Ok(v), Ok(d)) if d != 0.0 => (v % d).abs() < MULTIPLE_OF_EPSILON,
        _ => false,
    }
}
