//! ISO 8601 dates, times, datetimes and durations.

use crate::patterns::{self, datetime as datetime_pattern, time as time_pattern};
use crate::value::Value;
use chrono::{DateTime, NaiveDate};

/// Options for [`iso_datetime_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoDateTimeOptions {
    /// Fractional-second digits: `None` for any, negative for minute
    /// precision, `0` for whole seconds.
    pub precision: Option<i32>,
    /// Accept `±HH:MM` offsets in addition to `Z`.
    pub offset: bool,
    /// Accept datetimes without a zone designator.
    pub local: bool,
}

/// Options for [`iso_time_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoTimeOptions {
    /// Fractional-second digits, as in [`IsoDateTimeOptions::precision`].
    pub precision: Option<i32>,
}

/// `YYYY-MM-DD` naming a real calendar day.
pub fn iso_date(value: &Value) -> bool {
    value.as_str().is_some_and(|s| {
        patterns::DATE.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
    })
}

/// An RFC 3339 timestamp.
pub fn iso_datetime(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok())
}

/// An ISO datetime constrained by precision and zone options.
pub fn iso_datetime_with(value: &Value, options: &IsoDateTimeOptions) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    datetime_pattern(options.precision, options.offset, options.local)
        .is_ok_and(|re| re.is_match(s))
}

/// `HH:MM[:SS[.fff]]`.
pub fn iso_time(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| patterns::DEFAULT_TIME.is_match(s))
}

/// A time of day with an exact precision.
pub fn iso_time_with(value: &Value, options: &IsoTimeOptions) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    time_pattern(options.precision).is_ok_and(|re| re.is_match(s))
}

/// An ISO 8601 duration with at least one component.
///
/// `P`, `PT` and a `T` with nothing after it are rejected.
pub fn iso_duration(value: &Value) -> bool {
    value.as_str().is_some_and(|s| {
        s != "P" && !s.ends_with('T') && patterns::DURATION.is_match(s)
    })
}

/// A time-of-day value: either a native timestamp or an RFC 3339 string.
pub fn time_value(value: &Value) -> bool {
    match value.indirect() {
        Some(Value::Time(_)) => true,
        Some(_) => iso_datetime(value),
        None => false,
    }
}
