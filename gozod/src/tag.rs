//! Tag grammar: turns a `gozod:"..."` tag body into an ordered rule list.
//!
//! Lexing happens in two stages. The first splits the body into rule tokens
//! at top-level commas, honoring quotes, brackets, braces and the `\,`
//! escape. The second splits each token into a name and parameters.
//!
//! ```rust
//! use gozod::tag::parse_tag;
//!
//! let rules = parse_tag("required,min=2,enum=red green blue").unwrap();
//! assert_eq!(rules[1].params, vec!["2"]);
//! assert_eq!(rules[2].params, vec!["red", "green", "blue"]);
//! ```

use crate::rule::{Rule, RuleKind};
use thiserror::Error;
use tracing::trace;

/// Tag lexing and parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("empty rule name in token '{token}'")]
    EmptyRuleName { token: String },

    #[error("rule '{rule}' requires a parameter")]
    RuleRequiresParam { rule: String },

    #[error("invalid rule format '{token}': {reason}")]
    InvalidRuleFormat { token: String, reason: &'static str },

    #[error("unterminated {quote} quote in tag")]
    UnterminatedQuote { quote: char },

    #[error("unbalanced '{delimiter}' in tag")]
    UnbalancedDelimiter { delimiter: char },
}

/// Parses a tag body into rules, in source order.
///
/// An empty or whitespace-only body yields no rules. Unknown rule names are
/// accepted here; rejecting them is the consumer's decision.
pub fn parse_tag(tag: &str) -> Result<Vec<Rule>, TagError> {
    if tag.trim().is_empty() {
        return Ok(Vec::new());
    }
    let rules = split_rules(tag)?
        .iter()
        .map(|token| parse_rule(token))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(count = rules.len(), "parsed tag");
    Ok(rules)
}

// ============================================================================
// Stage 1: rule tokens
// ============================================================================

/// Splits a tag body at top-level commas.
///
/// Single quotes are only recognized at the top level; inside brackets or
/// braces the content is JSON-like and only double quotes are tracked.
fn split_rules(tag: &str) -> Result<Vec<String>, TagError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut brackets = 0usize;
    let mut braces = 0usize;
    let mut escaped = false;

    for c in tag.chars() {
        let nested = brackets > 0 || braces > 0;

        if escaped {
            escaped = false;
            if c == ',' && quote.is_none() && !nested {
                current.push(',');
            } else {
                current.push('\\');
                current.push(c);
            }
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' if !nested => quote = Some(c),
            '"' => quote = Some(c),
            '[' => brackets += 1,
            ']' => {
                brackets = brackets
                    .checked_sub(1)
                    .ok_or(TagError::UnbalancedDelimiter { delimiter: ']' })?;
            }
            '{' => braces += 1,
            '}' => {
                braces = braces
                    .checked_sub(1)
                    .ok_or(TagError::UnbalancedDelimiter { delimiter: '}' })?;
            }
            ',' if !nested => {
                tokens.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    if escaped {
        current.push('\\');
    }
    if let Some(quote) = quote {
        return Err(TagError::UnterminatedQuote { quote });
    }
    if brackets > 0 {
        return Err(TagError::UnbalancedDelimiter { delimiter: '[' });
    }
    if braces > 0 {
        return Err(TagError::UnbalancedDelimiter { delimiter: '{' });
    }
    tokens.push(current);
    Ok(tokens)
}

/// Whether `param` passes through the first lexing stage as one unchanged
/// token.
pub(crate) fn lexes_verbatim(param: &str) -> bool {
    matches!(split_rules(param), Ok(tokens) if tokens.len() == 1 && tokens[0] == param)
}

// ============================================================================
// Stage 2: name and parameters
// ============================================================================

fn parse_rule(token: &str) -> Result<Rule, TagError> {
    let (name, body) = match token.split_once('=') {
        Some((name, body)) => (name.trim(), Some(body.trim())),
        None => (token.trim(), None),
    };

    if name.is_empty() {
        return Err(TagError::EmptyRuleName {
            token: token.to_string(),
        });
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(TagError::InvalidRuleFormat {
            token: token.to_string(),
            reason: "rule names are alphanumeric",
        });
    }

    let params = match body {
        None => {
            if RuleKind::from_name(name).is_some_and(RuleKind::takes_param) {
                return Err(TagError::RuleRequiresParam {
                    rule: name.to_string(),
                });
            }
            Vec::new()
        }
        Some("") => {
            return Err(TagError::RuleRequiresParam {
                rule: name.to_string(),
            })
        }
        Some(body) => split_params(name, body),
    };

    if !params.is_empty() && params.iter().all(|p| p.trim().is_empty()) {
        return Err(TagError::InvalidRuleFormat {
            token: token.to_string(),
            reason: "parameter is empty",
        });
    }

    Ok(Rule {
        name: name.to_string(),
        params,
    })
}

fn split_params(name: &str, body: &str) -> Vec<String> {
    let wrapped = (body.starts_with('[') && body.ends_with(']'))
        || (body.starts_with('{') && body.ends_with('}'));
    if wrapped {
        return vec![body.to_string()];
    }
    if let Some(inner) = quoted_inner(body) {
        return vec![unescape(inner)];
    }
    // `enum` lists and any other non-regex body with whitespace split into words.
    if name != "regex" && body.contains(char::is_whitespace) {
        return split_words(body);
    }
    vec![body.to_string()]
}

/// Returns the content of `s` if the whole string is one quoted literal.
fn quoted_inner(s: &str) -> Option<&str> {
    let q = s.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == q {
            return (i + c.len_utf8() == s.len()).then(|| &s[1..i]);
        }
    }
    None
}

fn split_words(body: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    let mut flush = |current: &mut String| {
        if !current.is_empty() {
            let word = std::mem::take(current);
            words.push(match quoted_inner(&word) {
                Some(inner) => unescape(inner),
                None => word,
            });
        }
    };

    for c in body.chars() {
        if escaped {
            escaped = false;
            current.push(c);
            continue;
        }
        match (quote, c) {
            (_, '\\') => {
                escaped = true;
                current.push(c);
            }
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, c) if c.is_whitespace() => flush(&mut current),
            (None, c) => current.push(c),
        }
    }
    flush(&mut current);
    words
}

/// Decodes the escapes allowed inside quoted parameters. Unknown escapes
/// keep their backslash.
pub(crate) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(c @ ('\'' | '"' | '\\' | ',')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
