//! Runtime evaluation of a parsed rule list against a value.
//!
//! This is the reflection-free counterpart of generated schemas: a
//! [`RuleSet`] walks its rules in tag order, applies transformations, and
//! collects an [`Issue`] for every rule the value fails.

use crate::coerce::to_string;
use crate::rule::{Rule, RuleKind};
use crate::tag::{parse_tag, TagError};
use crate::validate::{length, numeric, string};
use crate::value::Value;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// Why a rule produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// A required value was nil.
    Required,
    /// The rule name is not in the vocabulary.
    UnknownRule,
    /// The rule's parameter could not be interpreted.
    InvalidParam,
    /// The value failed the check.
    Failed,
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// Tag spelling of the rule that failed.
    pub rule: String,
    pub code: IssueCode,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

/// Result of running a [`RuleSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// The value after transformations such as `trim`.
    pub value: Value,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    /// Whether every rule passed.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A parsed tag ready to check values.
///
/// ```rust
/// use gozod::{RuleSet, Value};
///
/// let rules = RuleSet::parse("required,trim,min=2,max=5").unwrap();
/// let report = rules.check(&Value::from("  ab  "));
/// assert!(report.is_ok());
/// assert_eq!(report.value, Value::from("ab"));
///
/// assert!(!rules.check(&Value::Nil).is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parses a tag body.
    pub fn parse(tag: &str) -> Result<Self, TagError> {
        Ok(Self::from_rules(parse_tag(tag)?))
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn has(&self, kind: RuleKind) -> bool {
        self.rules.iter().any(|r| r.kind() == Some(kind))
    }

    pub fn is_required(&self) -> bool {
        self.has(RuleKind::Required)
    }

    pub fn is_nilable(&self) -> bool {
        self.has(RuleKind::Nilable)
    }

    /// Checks `value` against every rule, in order.
    ///
    /// A nil value short-circuits: it fails `required` and otherwise passes.
    pub fn check(&self, value: &Value) -> CheckReport {
        if value.is_nil() {
            let issues = if self.is_required() && !self.is_nilable() {
                vec![Issue {
                    rule: RuleKind::Required.name().to_string(),
                    code: IssueCode::Required,
                    message: "value is required".to_string(),
                }]
            } else {
                Vec::new()
            };
            return CheckReport {
                value: value.clone(),
                issues,
            };
        }

        let mut current = value.clone();
        let mut issues = Vec::new();
        for rule in &self.rules {
            if let Err(issue) = apply(rule, &mut current) {
                trace!(rule = %rule, code = ?issue.code, "rule failed");
                issues.push(issue);
            }
        }
        debug!(rules = self.rules.len(), issues = issues.len(), "checked value");
        CheckReport {
            value: current,
            issues,
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::rule::rules_to_tag(&self.rules))
    }
}

// ============================================================================
// Rule application
// ============================================================================

fn issue(rule: &Rule, code: IssueCode, message: impl Into<String>) -> Issue {
    Issue {
        rule: rule.to_tag(),
        code,
        message: message.into(),
    }
}

/// Parses a numeric rule parameter.
fn number_param(rule: &Rule) -> Result<Value, Issue> {
    let raw = rule.param().unwrap_or_default().trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Value::Uint(u));
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Value::Float(f)),
        _ => Err(issue(
            rule,
            IssueCode::InvalidParam,
            format!("'{raw}' is not a number"),
        )),
    }
}

fn size_param(rule: &Rule) -> Result<usize, Issue> {
    let raw = rule.param().unwrap_or_default().trim();
    raw.parse::<usize>().map_err(|_| {
        issue(
            rule,
            IssueCode::InvalidParam,
            format!("'{raw}' is not a length"),
        )
    })
}

fn require(rule: &Rule, passed: bool, message: impl FnOnce() -> String) -> Result<(), Issue> {
    if passed {
        Ok(())
    } else {
        Err(issue(rule, IssueCode::Failed, message()))
    }
}

fn apply(rule: &Rule, current: &mut Value) -> Result<(), Issue> {
    let Some(kind) = rule.kind() else {
        return Err(issue(
            rule,
            IssueCode::UnknownRule,
            format!("unknown rule '{}'", rule.name),
        ));
    };

    use RuleKind::*;
    match kind {
        Required | Nilable | Default | Prefault | Refine | Check => Ok(()),

        Trim => {
            *current = string::trim(current);
            Ok(())
        }

        Min | Max if current.is_numeric() => {
            let limit = number_param(rule)?;
            let (passed, word) = if kind == Min {
                (numeric::gte(current, &limit), "at least")
            } else {
                (numeric::lte(current, &limit), "at most")
            };
            require(rule, passed, || format!("must be {word} {}", rule.joined_params()))
        }
        Min | Max | Length | Size => {
            let n = size_param(rule)?;
            let (passed, word) = match kind {
                Min => (length::min_length(current, n), "at least"),
                Max => (length::max_length(current, n), "at most"),
                _ => (length::length(current, n), "exactly"),
            };
            require(rule, passed, || format!("length must be {word} {n}"))
        }

        Gt | Gte | Lt | Lte => {
            let limit = number_param(rule)?;
            let (passed, op) = match kind {
                Gt => (numeric::gt(current, &limit), ">"),
                Gte => (numeric::gte(current, &limit), ">="),
                Lt => (numeric::lt(current, &limit), "<"),
                _ => (numeric::lte(current, &limit), "<="),
            };
            require(rule, passed, || format!("must be {op} {}", rule.joined_params()))
        }
        MultipleOf => {
            let divisor = number_param(rule)?;
            require(rule, numeric::multiple_of(current, &divisor), || {
                format!("must be a multiple of {}", rule.joined_params())
            })
        }

        Includes | StartsWith | EndsWith => {
            let needle = rule.joined_params();
            let passed = match kind {
                Includes => string::includes(current, &needle),
                StartsWith => string::starts_with(current, &needle),
                _ => string::ends_with(current, &needle),
            };
            require(rule, passed, || format!("must satisfy {}", rule.name))
        }

        Regex => {
            let pattern = rule.param().unwrap_or_default();
            let re = regex::Regex::new(pattern).map_err(|e| {
                issue(rule, IssueCode::InvalidParam, format!("invalid pattern: {e}"))
            })?;
            require(rule, string::matches(current, &re), || {
                format!("must match {pattern}")
            })
        }

        Enum => {
            let passed = if current.is_numeric() {
                rule.params.iter().any(|p| {
                    let candidate = Rule::new("enum", [p.as_str()]);
                    number_param(&candidate).is_ok_and(|n| {
                        numeric::gte(current, &n) && numeric::lte(current, &n)
                    })
                })
            } else {
                to_string(current).is_ok_and(|s| rule.params.iter().any(|p| *p == s))
            };
            require(rule, passed, || {
                format!("must be one of [{}]", rule.params.join(", "))
            })
        }

        _ => match kind.predicate() {
            Some(predicate) => require(rule, predicate(current), || {
                format!("must be a valid {}", rule.name)
            }),
            None => Ok(()),
        },
    }
}
