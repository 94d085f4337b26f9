//! Parameterized pattern factories.
//!
//! Each factory builds an anchored pattern from its inputs and memoizes the
//! compiled result in a process-wide cache keyed by those inputs. The cache
//! lock is only held while looking up or inserting an entry; compilation
//! happens outside of it, so two threads racing on a new key may both compile
//! and the first insert wins.

use super::{uuid_source, DATE_SOURCE, UUID};
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::trace;

/// Error compiling a factory-built pattern.
#[derive(Debug, Clone, Error)]
#[error("invalid pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The generated pattern source.
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Cache key; one variant per factory, holding its inputs by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PatternKey {
    Time(Option<i32>),
    Datetime {
        precision: Option<i32>,
        offset: bool,
        local: bool,
    },
    Mac(String),
    StringLength { min: usize, max: i64 },
    Uuid(u8),
}

static CACHE: LazyLock<Mutex<HashMap<PatternKey, Regex>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn cached(key: PatternKey, build: impl FnOnce() -> String) -> Result<Regex, PatternError> {
    if let Some(re) = CACHE.lock().get(&key) {
        return Ok(re.clone());
    }

    let pattern = build();
    trace!(?key, %pattern, "compiling factory pattern");
    let compiled = Regex::new(&pattern).map_err(|source| PatternError { pattern, source })?;

    Ok(CACHE.lock().entry(key).or_insert(compiled).clone())
}

/// Unanchored `HH:MM[:SS[.f]]` source for the given precision.
///
/// - `None`: seconds optional, any number of fractional digits
/// - negative: minutes only
/// - `0`: whole seconds
/// - `n`: exactly `n` fractional digits
pub(crate) fn time_source(precision: Option<i32>) -> String {
    const HHMM: &str = "(?:[01][0-9]|2[0-3]):[0-5][0-9]";
    match precision {
        None => format!(r"{HHMM}(?::[0-5][0-9](?:\.[0-9]+)?)?"),
        Some(p) if p < 0 => HHMM.to_string(),
        Some(0) => format!("{HHMM}:[0-5][0-9]"),
        Some(p) => format!(r"{HHMM}:[0-5][0-9]\.[0-9]{{{p}}}"),
    }
}

/// Anchored ISO datetime source.
pub(crate) fn datetime_source(precision: Option<i32>, offset: bool, local: bool) -> String {
    let mut zones = vec!["Z".to_string()];
    if local {
        zones.push(String::new());
    }
    if offset {
        zones.push("[+-][0-9]{2}:[0-9]{2}".to_string());
    }
    format!(
        "^{DATE_SOURCE}T(?:{}(?:{}))$",
        time_source(precision),
        zones.join("|")
    )
}

/// Time-of-day pattern with the given fractional-second precision.
pub fn time(precision: Option<i32>) -> Result<Regex, PatternError> {
    cached(PatternKey::Time(precision), || {
        format!("^{}$", time_source(precision))
    })
}

/// ISO datetime pattern.
///
/// `offset` additionally accepts `±HH:MM` zones; `local` makes the zone
/// designator optional altogether.
pub fn datetime(precision: Option<i32>, offset: bool, local: bool) -> Result<Regex, PatternError> {
    cached(
        PatternKey::Datetime {
            precision,
            offset,
            local,
        },
        || datetime_source(precision, offset, local),
    )
}

/// MAC-48 address with the given octet delimiter (`":"` when empty).
///
/// Hex digits must be all upper- or all lowercase within one address.
pub fn mac(delimiter: &str) -> Result<Regex, PatternError> {
    let delimiter = if delimiter.is_empty() { ":" } else { delimiter };
    cached(PatternKey::Mac(delimiter.to_string()), || {
        let d = regex::escape(delimiter);
        format!("^(?:[0-9A-F]{{2}}{d}){{5}}[0-9A-F]{{2}}$|^(?:[0-9a-f]{{2}}{d}){{5}}[0-9a-f]{{2}}$")
    })
}

/// Any string whose character count lies in `[min, max]`.
///
/// A non-positive `max` removes the upper bound.
pub fn string_regex(min: usize, max: i64) -> Result<Regex, PatternError> {
    cached(PatternKey::StringLength { min, max }, || {
        if max <= 0 {
            format!(r"^[\s\S]{{{min},}}$")
        } else {
            format!(r"^[\s\S]{{{min},{max}}}$")
        }
    })
}

/// UUID restricted to a single version; versions outside `1..=8` fall back to
/// the generic [`UUID`] pattern.
pub fn uuid_for_version(version: u8) -> Regex {
    if !(1..=8).contains(&version) {
        return UUID.clone();
    }
    cached(PatternKey::Uuid(version), || {
        format!("^{}$", uuid_source(&version.to_string()))
    })
    .unwrap_or_else(|_| UUID.clone())
}
