//! Target-parameterized numeric conversion.

use super::{format_float, to_float64, to_i128, CoercionError, Result};
use crate::value::Value;
use num_traits::{Bounded, Float, NumCast, PrimInt, ToPrimitive};
use std::any::type_name;

/// Converts to any primitive integer type, range-checked against `T`.
///
/// ```rust
/// use gozod::coerce::{to_integer, CoercionError};
/// use gozod::Value;
///
/// assert_eq!(to_integer::<i8>(&Value::Int(127)), Ok(127));
/// assert!(matches!(to_integer::<i8>(&Value::Int(128)), Err(CoercionError::Overflow { .. })));
/// assert!(matches!(to_integer::<u16>(&Value::from("-1")), Err(CoercionError::NegativeToUnsigned { .. })));
/// ```
pub fn to_integer<T>(value: &Value) -> Result<T>
where
    T: PrimInt + Bounded + NumCast,
{
    let to = type_name::<T>();
    let n = to_i128(value, to)?;
    let from = value.indirect().map_or("nil", Value::type_name);

    let min = T::min_value().to_i128().unwrap_or(i128::MIN);
    let max = T::max_value().to_i128().unwrap_or(i128::MAX);

    if n < 0 && min == 0 {
        return Err(CoercionError::NegativeToUnsigned {
            from,
            value: n.to_string(),
            to,
        });
    }
    if n < min || n > max {
        return Err(CoercionError::overflow(from, n, to));
    }
    <T as NumCast>::from(n).ok_or_else(|| CoercionError::overflow(from, n, to))
}

/// Converts to `f32` or `f64`.
///
/// Finite values whose magnitude exceeds the target's maximum overflow;
/// infinities and NaN pass through unchanged.
pub fn to_float<T>(value: &Value) -> Result<T>
where
    T: Float + NumCast,
{
    let to = type_name::<T>();
    let f = to_float64(value).map_err(|e| match e {
        CoercionError::NilPointer { .. } => CoercionError::NilPointer { to },
        CoercionError::UnsupportedConversion { from, .. } => {
            CoercionError::UnsupportedConversion { from, to }
        }
        CoercionError::InvalidFormat { from, value, .. } => {
            CoercionError::InvalidFormat { from, value, to }
        }
        other => other,
    })?;

    let max = T::max_value().to_f64().unwrap_or(f64::MAX);
    if f.is_finite() && f.abs() > max {
        let from = value.indirect().map_or("nil", Value::type_name);
        return Err(CoercionError::overflow(from, format_float(f), to));
    }
    <T as NumCast>::from(f).ok_or_else(|| {
        CoercionError::overflow(
            value.indirect().map_or("nil", Value::type_name),
            format_float(f),
            to,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int8_bounds() {
        assert_eq!(to_integer::<i8>(&Value::Int(127)), Ok(127));
        assert_eq!(to_integer::<i8>(&Value::Int(-128)), Ok(-128));
        assert!(matches!(
            to_integer::<i8>(&Value::Int(128)),
            Err(CoercionError::Overflow { .. })
        ));
        assert!(matches!(
            to_integer::<i8>(&Value::from("-129")),
            Err(CoercionError::Overflow { .. })
        ));
    }

    #[test]
    fn test_unsigned_rejects_negatives() {
        let err = to_integer::<u32>(&Value::Int(-1)).unwrap_err();
        assert_eq!(
            err,
            CoercionError::NegativeToUnsigned {
                from: "int64",
                value: "-1".into(),
                to: "u32"
            }
        );
    }

    #[test]
    fn test_u64_above_i64_max() {
        assert_eq!(to_integer::<u64>(&Value::Uint(u64::MAX)), Ok(u64::MAX));
        assert_eq!(
            to_integer::<u64>(&Value::from("18446744073709551615")),
            Ok(u64::MAX)
        );
        assert!(matches!(
            to_integer::<u64>(&Value::from("18446744073709551616")),
            Err(CoercionError::Overflow { .. })
        ));
    }

    #[test]
    fn test_whole_float_to_integer() {
        assert_eq!(to_integer::<i16>(&Value::Float(300.0)), Ok(300));
        assert!(matches!(
            to_integer::<i16>(&Value::Float(3.25)),
            Err(CoercionError::NotWholeNumber { to: "i16", .. })
        ));
    }

    #[test]
    fn test_float32_overflow() {
        assert_eq!(to_float::<f32>(&Value::Float(1.5)), Ok(1.5f32));
        assert!(matches!(
            to_float::<f32>(&Value::Float(1e39)),
            Err(CoercionError::Overflow { to: "f32", .. })
        ));
        assert_eq!(to_float::<f64>(&Value::Float(1e39)), Ok(1e39));
        assert!(to_float::<f32>(&Value::Float(f64::INFINITY)).unwrap().is_infinite());
    }

    #[test]
    fn test_float_errors_name_target() {
        assert_eq!(
            to_float::<f32>(&Value::Ptr(None)),
            Err(CoercionError::NilPointer { to: "f32" })
        );
        assert!(matches!(
            to_float::<f32>(&Value::from("x")),
            Err(CoercionError::InvalidFormat { to: "f32", .. })
        ));
    }
}
