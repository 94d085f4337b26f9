//! Length and size bounds.
//!
//! Strings count characters; bytes, slices and maps count elements. Values
//! without a size fail every bound. The `*_size` family is the same check
//! under the name used for collection rules.

use crate::value::Value;

fn within(value: &Value, check: impl FnOnce(usize) -> bool) -> bool {
    value.size().is_some_and(check)
}

pub fn max_length(value: &Value, max: usize) -> bool {
    within(value, |n| n <= max)
}

pub fn min_length(value: &Value, min: usize) -> bool {
    within(value, |n| n >= min)
}

/// Exact length.
pub fn length(value: &Value, exact: usize) -> bool {
    within(value, |n| n == exact)
}

pub fn max_size(value: &Value, max: usize) -> bool {
    max_length(value, max)
}

pub fn min_size(value: &Value, min: usize) -> bool {
    min_length(value, min)
}

/// Exact collection size.
pub fn size(value: &Value, exact: usize) -> bool {
    length(value, exact)
}
