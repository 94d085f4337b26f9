//! Go literal rendering.
//!
//! Every parameter that ends up as a Go literal is first narrowed through
//! the coercion kernel, so a value that does not fit the field's kind is
//! rejected here instead of producing code that fails to compile.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Timelike};
use gozod::coerce::{self, to_float, to_integer, to_literal};
use gozod::{Rule, Value};

use crate::error::EmissionError;
use crate::ir::{FieldDescriptor, PrimitiveKind, SemanticType};

/// Quotes a string the way Go's `strconv.Quote` does.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{b}' => out.push_str("\\v"),
            c if c.is_control() => {
                let code = u32::from(c);
                if code < 0x80 {
                    let _ = write!(out, "\\x{code:02x}");
                } else if code <= 0xffff {
                    let _ = write!(out, "\\u{code:04x}");
                } else {
                    let _ = write!(out, "\\U{code:08x}");
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a value as a literal of the given kind.
pub(crate) fn scalar(kind: PrimitiveKind, value: &Value) -> Result<String, String> {
    use PrimitiveKind::*;
    let text = match kind {
        String => go_quote(&coerce::to_string(value).map_err(|e| e.to_string())?),
        Bool => coerce::to_bool(value).map_err(|e| e.to_string())?.to_string(),
        Int | Int64 => integer::<i64>(value)?,
        Int8 => integer::<i8>(value)?,
        Int16 => integer::<i16>(value)?,
        Int32 => integer::<i32>(value)?,
        Uint | Uint64 | Uintptr => integer::<u64>(value)?,
        Uint8 => integer::<u8>(value)?,
        Uint16 => integer::<u16>(value)?,
        Uint32 => integer::<u32>(value)?,
        Float32 => finite(to_float::<f32>(value).map_err(|e| e.to_string())?)?,
        Float64 => finite(to_float::<f64>(value).map_err(|e| e.to_string())?)?,
        Complex64 => {
            let c = coerce::to_complex64(value).map_err(|e| e.to_string())?;
            format!("complex({}, {})", finite(c.re)?, finite(c.im)?)
        }
        Complex128 => {
            let c = coerce::to_complex128(value).map_err(|e| e.to_string())?;
            format!("complex({}, {})", finite(c.re)?, finite(c.im)?)
        }
    };
    Ok(text)
}

fn integer<T>(value: &Value) -> Result<String, String>
where
    T: num_traits::PrimInt + num_traits::Bounded + num_traits::NumCast + ToString,
{
    to_integer::<T>(value)
        .map(|n| n.to_string())
        .map_err(|e| e.to_string())
}

/// Magnitudes outside `[1e-6, 1e21)` are spelled with an exponent.
fn finite<F>(f: F) -> Result<String, String>
where
    F: num_traits::Float + std::fmt::Display + std::fmt::LowerExp,
{
    if f.is_finite() {
        let magnitude = f.abs().to_f64().unwrap_or(0.0);
        if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
            Ok(format!("{f:e}"))
        } else {
            Ok(f.to_string())
        }
    } else {
        Err(format!("{f} has no Go literal"))
    }
}

/// Renders a value with no static type, as an `any` literal.
///
/// Scalars are narrowed first, so `1` and `0` read as booleans. JSON arrays
/// and objects become `[]any` and `map[string]any` literals.
pub(crate) fn any_literal(value: &Value) -> Option<String> {
    Some(match to_literal(value) {
        Value::Nil | Value::Ptr(None) => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) => u.to_string(),
        Value::BigInt(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => format!("{f:?}"),
        Value::Float32(f) if f.is_finite() => format!("{f:?}"),
        Value::String(s) => go_quote(&s),
        Value::Array(items) => {
            let items = items.iter().map(any_literal).collect::<Option<Vec<_>>>()?;
            format!("[]any{{{}}}", items.join(", "))
        }
        Value::Map(pairs) => {
            let mut entries = BTreeMap::new();
            for (key, value) in &pairs {
                entries.insert(key.as_str()?.to_string(), any_literal(value)?);
            }
            map_literal("any", entries)
        }
        _ => return None,
    })
}

fn map_literal(value_type: &str, entries: BTreeMap<String, String>) -> String {
    let body = entries
        .iter()
        .map(|(k, v)| format!("{}: {v}", go_quote(k)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("map[string]{value_type}{{{body}}}")
}

/// Renders an RFC 3339 timestamp as a `time.Date` call.
pub(crate) fn time_literal(text: &str) -> Option<String> {
    let t = DateTime::parse_from_rfc3339(text.trim()).ok()?;
    let offset = t.offset().local_minus_utc();
    let location = if offset == 0 {
        "time.UTC".to_string()
    } else {
        format!("time.FixedZone(\"\", {offset})")
    };
    Some(format!(
        "time.Date({}, {}, {}, {}, {}, {}, {}, {location})",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
        t.nanosecond(),
    ))
}

/// How a rule parameter is decoded into a value.
fn param_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
            return Value::from_json(&json);
        }
    }
    Value::from(raw)
}

/// Renders the argument of `default` or `prefault` for a field.
///
/// Pointer fields take the pointee's literal.
pub fn value_literal(rule: &Rule, field: &FieldDescriptor) -> Result<String, EmissionError> {
    let raw = rule.joined_params();
    let unsupported = |reason: &str| EmissionError::UnsupportedLiteral {
        rule: rule.name.clone(),
        type_expression: field.type_expression.clone(),
        reason: reason.to_string(),
    };
    let invalid = |reason: String| EmissionError::InvalidParam {
        rule: rule.name.clone(),
        param: raw.clone(),
        reason,
    };

    match field.semantic_type.pointee() {
        SemanticType::Primitive(kind) => scalar(*kind, &Value::from(raw.as_str())).map_err(invalid),
        SemanticType::Time => {
            time_literal(&raw).ok_or_else(|| invalid("expected an RFC 3339 timestamp".into()))
        }
        SemanticType::Any => any_literal(&param_value(&raw))
            .ok_or_else(|| unsupported("value has no Go literal form")),
        SemanticType::Slice(elem) => {
            let items = match param_value(&raw) {
                Value::Array(items) => items,
                Value::Map(_) => return Err(unsupported("an object cannot initialize a slice")),
                _ => rule.params.iter().map(|p| Value::from(p.as_str())).collect(),
            };
            let render = element_renderer(elem).ok_or_else(|| {
                unsupported("slice elements must be scalars or any")
            })?;
            let items = items
                .iter()
                .map(|item| render(item))
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid)?;
            Ok(format!("[]{}{{{}}}", elem.go_type(), items.join(", ")))
        }
        SemanticType::Map { key, value } => {
            if **key != SemanticType::Primitive(PrimitiveKind::String) {
                return Err(unsupported("map defaults need string keys"));
            }
            let Value::Map(pairs) = param_value(&raw) else {
                return Err(unsupported("expected a JSON object"));
            };
            let render = element_renderer(value)
                .ok_or_else(|| unsupported("map values must be scalars or any"))?;
            let mut entries = BTreeMap::new();
            for (k, v) in &pairs {
                let k = k.as_str().ok_or_else(|| unsupported("object keys must be strings"))?;
                entries.insert(k.to_string(), render(v).map_err(invalid)?);
            }
            Ok(map_literal(&value.go_type(), entries))
        }
        SemanticType::Pointer(_) | SemanticType::Struct(_) => {
            Err(unsupported("no literal form for this type"))
        }
    }
}

type ElementRenderer = Box<dyn Fn(&Value) -> Result<String, String>>;

/// Literal renderer for a collection element, when the element has one.
fn element_renderer(elem: &SemanticType) -> Option<ElementRenderer> {
    match elem {
        SemanticType::Primitive(kind) => {
            let kind = *kind;
            Some(Box::new(move |v: &Value| scalar(kind, v)))
        }
        SemanticType::Any => Some(Box::new(|v: &Value| {
            any_literal(v).ok_or_else(|| "value has no Go literal form".to_string())
        })),
        _ => None,
    }
}

/// Renders the arguments of `enum` for an element of type `leaf`.
pub fn enum_literals(rule: &Rule, leaf: &SemanticType) -> Result<Vec<String>, EmissionError> {
    let render = element_renderer(leaf).ok_or_else(|| EmissionError::UnsupportedLiteral {
        rule: rule.name.clone(),
        type_expression: leaf.go_type(),
        reason: "enum values must be scalars".to_string(),
    })?;
    rule.params
        .iter()
        .map(|p| {
            render(&Value::from(p.as_str())).map_err(|reason| EmissionError::InvalidParam {
                rule: rule.name.clone(),
                param: p.clone(),
                reason,
            })
        })
        .collect()
}

/// Renders an ordered bound (`gt`, `min` on a number, ...) for a numeric
/// kind. Integers are normalized; floats keep their source spelling.
pub(crate) fn bound(kind: PrimitiveKind, param: &str) -> Result<String, String> {
    if kind.is_integer() {
        scalar(kind, &Value::from(param))
    } else if kind.is_float() {
        scalar(kind, &Value::from(param))?;
        Ok(param.trim().to_string())
    } else {
        Err(format!("{} has no ordering", kind.go_name()))
    }
}

/// Renders a length or count, which must be a non-negative integer.
pub(crate) fn size(param: &str) -> Result<String, String> {
    integer::<u64>(&Value::from(param))
}
