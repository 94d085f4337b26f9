//! Dynamically-typed values consumed by the coercion kernel and validators.
//!
//! [`Value`] mirrors the shapes a struct field can hold at runtime: scalars of
//! every width, strings and bytes, nullable pointers, timestamps, and the two
//! collection kinds. Validators accept `&Value` so that a single predicate can
//! be evaluated against any field without knowing its static type.

use chrono::{DateTime, FixedOffset};
use std::fmt;

/// A complex number with `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

/// A complex number with `f64` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

impl Complex128 {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "({}{}i)", self.re, self.im)
        } else {
            write!(f, "({}+{}i)", self.re, self.im)
        }
    }
}

/// A runtime value.
///
/// Maps preserve insertion order and may carry non-string keys; validators
/// that require string keys check for it explicitly.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The untyped nil value.
    #[default]
    Nil,
    /// A pointer; `None` is a nil pointer.
    Ptr(Option<Box<Value>>),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float(f64),
    /// An arbitrary-precision integer, bounded to 128 bits.
    BigInt(i128),
    Complex64(Complex64),
    Complex128(Complex128),
    String(String),
    Bytes(Vec<u8>),
    Time(DateTime<FixedOffset>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Short name of the value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Ptr(_) => "pointer",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int64",
            Value::Uint(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Float(_) => "float64",
            Value::BigInt(_) => "big.Int",
            Value::Complex64(_) => "complex64",
            Value::Complex128(_) => "complex128",
            Value::String(_) => "string",
            Value::Bytes(_) => "[]byte",
            Value::Time(_) => "time.Time",
            Value::Array(_) => "slice",
            Value::Map(_) => "map",
        }
    }

    /// Follows pointers until a non-pointer value is reached.
    ///
    /// Returns `None` for nil and for a nil pointer anywhere along the chain.
    pub fn indirect(&self) -> Option<&Value> {
        match self {
            Value::Nil | Value::Ptr(None) => None,
            Value::Ptr(Some(inner)) => inner.indirect(),
            other => Some(other),
        }
    }

    /// Whether the value is nil or a nil pointer.
    pub fn is_nil(&self) -> bool {
        self.indirect().is_none()
    }

    /// Whether the value is one of the numeric kinds (after dereferencing).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.indirect(),
            Some(
                Value::Int(_)
                    | Value::Uint(_)
                    | Value::Float32(_)
                    | Value::Float(_)
                    | Value::BigInt(_)
            )
        )
    }

    /// Borrows the string content, if the value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self.indirect() {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Wraps a value in a non-nil pointer.
    pub fn ptr(inner: Value) -> Self {
        Value::Ptr(Some(Box::new(inner)))
    }

    /// Number of elements for sized values: characters of a string, bytes,
    /// array elements, or map entries.
    pub fn size(&self) -> Option<usize> {
        match self.indirect()? {
            Value::String(s) => Some(s.chars().count()),
            Value::Bytes(b) => Some(b.len()),
            Value::Array(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Converts a JSON document into a value.
    ///
    /// Integral JSON numbers become `Int` (or `Uint` above `i64::MAX`), all
    /// others become `Float`. Object keys become string keys.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (Value::String(k.clone()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    isize => Int as i64,
    u8 => Uint as u64,
    u16 => Uint as u64,
    u32 => Uint as u64,
    u64 => Uint as u64,
    usize => Uint as u64,
    f32 => Float32 as f32,
    f64 => Float as f64,
    i128 => BigInt as i128,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::Complex64(v)
    }
}

impl From<Complex128> for Value {
    fn from(v: Complex128) -> Self {
        Value::Complex128(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Time(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Ptr(v.map(|inner| Box::new(inner.into())))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indirect_follows_pointer_chain() {
        let v = Value::ptr(Value::ptr(Value::Int(3)));
        assert_eq!(v.indirect(), Some(&Value::Int(3)));
        assert!(Value::Ptr(None).is_nil());
        assert!(Value::ptr(Value::Ptr(None)).is_nil());
    }

    #[test]
    fn test_size_counts_characters() {
        assert_eq!(Value::from("héllo").size(), Some(5));
        assert_eq!(Value::from(vec![1i32, 2, 3]).size(), Some(3));
        assert_eq!(Value::Int(4).size(), None);
    }

    #[test]
    fn test_from_json_numbers() {
        let json: serde_json::Value = serde_json::from_str(r#"[1, 18446744073709551615, 2.5]"#).unwrap();
        assert_eq!(
            Value::from_json(&json),
            Value::Array(vec![Value::Int(1), Value::Uint(u64::MAX), Value::Float(2.5)])
        );
    }

    #[test]
    fn test_option_becomes_pointer() {
        assert_eq!(Value::from(None::<i32>), Value::Ptr(None));
        assert_eq!(Value::from(Some("a")), Value::ptr(Value::from("a")));
    }
}
