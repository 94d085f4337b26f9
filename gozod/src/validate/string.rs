//! String form predicates and transformations.

use crate::value::Value;
use regex::Regex;

fn with_str(value: &Value, check: impl FnOnce(&str) -> bool) -> bool {
    value.as_str().is_some_and(check)
}

/// Contains no uppercase characters.
pub fn lowercase(value: &Value) -> bool {
    with_str(value, |s| !s.chars().any(char::is_uppercase))
}

/// Contains no lowercase characters.
pub fn uppercase(value: &Value) -> bool {
    with_str(value, |s| !s.chars().any(char::is_lowercase))
}

pub fn includes(value: &Value, needle: &str) -> bool {
    with_str(value, |s| s.contains(needle))
}

pub fn starts_with(value: &Value, prefix: &str) -> bool {
    with_str(value, |s| s.starts_with(prefix))
}

pub fn ends_with(value: &Value, suffix: &str) -> bool {
    with_str(value, |s| s.ends_with(suffix))
}

/// Matches a compiled pattern.
pub fn matches(value: &Value, pattern: &Regex) -> bool {
    with_str(value, |s| pattern.is_match(s))
}

/// Matches a pattern given as source text. An invalid pattern never matches.
pub fn regex(value: &Value, pattern: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| matches(value, &re))
}

fn map_str(value: &Value, f: impl FnOnce(&str) -> String) -> Value {
    match value.as_str() {
        Some(s) => Value::String(f(s)),
        None => value.clone(),
    }
}

/// Strips surrounding whitespace. Non-strings are returned unchanged.
pub fn trim(value: &Value) -> Value {
    map_str(value, |s| s.trim().to_string())
}

pub fn to_lower_case(value: &Value) -> Value {
    map_str(value, str::to_lowercase)
}

pub fn to_upper_case(value: &Value) -> Value {
    map_str(value, str::to_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_predicates() {
        assert!(lowercase(&Value::from("abc-123")));
        assert!(!lowercase(&Value::from("aBc")));
        assert!(uppercase(&Value::from("ABC 1")));
        assert!(!uppercase(&Value::from("ABc")));
        assert!(!lowercase(&Value::Int(1)));
    }

    #[test]
    fn test_substrings() {
        let v = Value::from("gozod rules");
        assert!(includes(&v, "zod"));
        assert!(starts_with(&v, "go"));
        assert!(ends_with(&v, "rules"));
        assert!(!ends_with(&v, "go"));
    }

    #[test]
    fn test_regex() {
        assert!(regex(&Value::from("ABC123"), "^[A-Z0-9]+$"));
        assert!(!regex(&Value::from("abc"), "^[A-Z0-9]+$"));
        assert!(!regex(&Value::from("abc"), "(unclosed"));
    }

    #[test]
    fn test_transformations() {
        assert_eq!(trim(&Value::from("  x ")), Value::from("x"));
        assert_eq!(to_upper_case(&Value::from("go")), Value::from("GO"));
        assert_eq!(to_lower_case(&Value::from("GO")), Value::from("go"));
        assert_eq!(trim(&Value::Int(3)), Value::Int(3));
    }
}
