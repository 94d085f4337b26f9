//! The rule model and the shared rule vocabulary.
//!
//! A [`Rule`] is one parsed tag token: a name plus its ordered parameters.
//! [`RULES`] is the single vocabulary table. Each entry names the schema
//! method the code emitter appends and, for parameterless predicates, the
//! validator the runtime evaluator calls. Both layers dispatch on
//! [`RuleKind`], so a name cannot be known to one layer and not the other.

use crate::tag;
use crate::validate::{format, iso, numeric, string};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named validator invocation with zero or more string parameters.
///
/// Parameters keep their source order; for `enum` that order is observable in
/// generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// Rule name, e.g. `min` or `email`.
    pub name: String,
    /// Decoded parameters, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

impl Rule {
    /// Create a rule with parameters.
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a parameterless rule.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// The vocabulary entry for this rule, if the name is reserved.
    pub fn kind(&self) -> Option<RuleKind> {
        RuleKind::from_name(&self.name)
    }

    /// The first parameter.
    pub fn param(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    /// All parameters joined by a single space.
    pub fn joined_params(&self) -> String {
        self.params.join(" ")
    }

    /// Serializes the rule back to tag syntax.
    ///
    /// The output re-parses to an equal rule. Parameters are quoted only when
    /// they would not survive the lexer verbatim.
    pub fn to_tag(&self) -> String {
        match self.params.as_slice() {
            [] => self.name.clone(),
            [single] => format!("{}={}", self.name, encode_single(single)),
            many => {
                let words: Vec<String> = many.iter().map(|p| encode_word(p)).collect();
                format!("{}={}", self.name, words.join(" "))
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tag())
    }
}

/// Serializes a rule list back to a tag body.
pub fn rules_to_tag(rules: &[Rule]) -> String {
    rules.iter().map(Rule::to_tag).collect::<Vec<_>>().join(",")
}

fn needs_quoting(param: &str) -> bool {
    param.is_empty()
        || param.chars().any(|c| {
            c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | ',' | '[' | ']' | '{' | '}')
        })
}

fn quote(param: &str) -> String {
    let mut out = String::with_capacity(param.len() + 2);
    out.push('\'');
    for c in param.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

fn encode_single(param: &str) -> String {
    let json_shaped = (param.starts_with('[') && param.ends_with(']'))
        || (param.starts_with('{') && param.ends_with('}'));
    if json_shaped && tag::lexes_verbatim(param) {
        param.to_string()
    } else {
        encode_word(param)
    }
}

fn encode_word(param: &str) -> String {
    if needs_quoting(param) {
        quote(param)
    } else {
        param.to_string()
    }
}

// ============================================================================
// Vocabulary
// ============================================================================

/// Every reserved rule name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    // Presence
    Required,
    Nilable,

    // Bounds
    Min,
    Max,
    Length,
    Size,
    Gt,
    Gte,
    Lt,
    Lte,
    MultipleOf,
    Positive,
    Negative,
    NonPositive,
    NonNegative,

    // String form
    Trim,
    Lowercase,
    Uppercase,
    Includes,
    StartsWith,
    EndsWith,
    Regex,

    // Formats
    Email,
    Url,
    Hostname,
    Uuid,
    Guid,
    Cuid,
    Cuid2,
    NanoId,
    Ulid,
    Xid,
    Ksuid,
    Ipv4,
    Ipv6,
    CidrV4,
    CidrV6,
    Base64,
    Base64Url,
    Hex,
    Md5Hex,
    Sha1Hex,
    Sha256Hex,
    Sha384Hex,
    Sha512Hex,
    E164,
    Emoji,
    Time,

    // Values and hooks
    Enum,
    Default,
    Prefault,
    Refine,
    Check,
}

/// A vocabulary entry.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    /// Tag spelling.
    pub name: &'static str,
    pub kind: RuleKind,
    /// Schema method appended by the emitter, without the leading dot.
    /// `None` when the rule emits no qualifier.
    pub method: Option<&'static str>,
    /// Whether the rule must carry at least one parameter.
    pub takes_param: bool,
    /// Runtime predicate for parameterless checks.
    pub predicate: Option<fn(&Value) -> bool>,
}

macro_rules! vocabulary {
    ($( $name:literal => $kind:ident, $method:expr, $param:literal, $pred:expr; )*) => {
        /// The rule vocabulary, in documentation order.
        pub static RULES: &[RuleSpec] = &[
            $(RuleSpec {
                name: $name,
                kind: RuleKind::$kind,
                method: $method,
                takes_param: $param,
                predicate: $pred,
            },)*
        ];

        impl RuleKind {
            /// Looks up a reserved rule name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(RuleKind::$kind),)*
                    _ => None,
                }
            }

            /// The tag spelling of this rule.
            pub fn name(self) -> &'static str {
                match self {
                    $(RuleKind::$kind => $name,)*
                }
            }
        }
    };
}

vocabulary! {
    "required"    => Required,    None,                 false, None;
    "nilable"     => Nilable,     Some("Nilable"),      false, None;

    "min"         => Min,         Some("Min"),          true,  None;
    "max"         => Max,         Some("Max"),          true,  None;
    "length"      => Length,      Some("Length"),       true,  None;
    "size"        => Size,        Some("Size"),         true,  None;
    "gt"          => Gt,          Some("Gt"),           true,  None;
    "gte"         => Gte,         Some("Gte"),          true,  None;
    "lt"          => Lt,          Some("Lt"),           true,  None;
    "lte"         => Lte,         Some("Lte"),          true,  None;
    "multipleOf"  => MultipleOf,  Some("MultipleOf"),   true,  None;
    "positive"    => Positive,    Some("Positive"),     false, Some(numeric::positive);
    "negative"    => Negative,    Some("Negative"),     false, Some(numeric::negative);
    "nonPositive" => NonPositive, Some("NonPositive"),  false, Some(numeric::non_positive);
    "nonNegative" => NonNegative, Some("NonNegative"),  false, Some(numeric::non_negative);

    "trim"        => Trim,        Some("Trim"),         false, None;
    "lowercase"   => Lowercase,   Some("ToLowerCase"),  false, Some(string::lowercase);
    "uppercase"   => Uppercase,   Some("ToUpperCase"),  false, Some(string::uppercase);
    "includes"    => Includes,    Some("Includes"),     true,  None;
    "startsWith"  => StartsWith,  Some("StartsWith"),   true,  None;
    "endsWith"    => EndsWith,    Some("EndsWith"),     true,  None;
    "regex"       => Regex,       Some("Regex"),        true,  None;

    "email"       => Email,       Some("Email"),        false, Some(format::email);
    "url"         => Url,         Some("URL"),          false, Some(format::url);
    "hostname"    => Hostname,    Some("Hostname"),     false, Some(format::hostname);
    "uuid"        => Uuid,        Some("UUID"),         false, Some(format::uuid);
    "guid"        => Guid,        Some("GUID"),         false, Some(format::guid);
    "cuid"        => Cuid,        Some("CUID"),         false, Some(format::cuid);
    "cuid2"       => Cuid2,       Some("CUID2"),        false, Some(format::cuid2);
    "nanoid"      => NanoId,      Some("NanoID"),       false, Some(format::nanoid);
    "ulid"        => Ulid,        Some("ULID"),         false, Some(format::ulid);
    "xid"         => Xid,         Some("XID"),          false, Some(format::xid);
    "ksuid"       => Ksuid,       Some("KSUID"),        false, Some(format::ksuid);
    "ipv4"        => Ipv4,        Some("IPv4"),         false, Some(format::ipv4);
    "ipv6"        => Ipv6,        Some("IPv6"),         false, Some(format::ipv6);
    "cidrv4"      => CidrV4,      Some("CIDRv4"),       false, Some(format::cidrv4);
    "cidrv6"      => CidrV6,      Some("CIDRv6"),       false, Some(format::cidrv6);
    "base64"      => Base64,      Some("Base64"),       false, Some(format::base64);
    "base64url"   => Base64Url,   Some("Base64URL"),    false, Some(format::base64url);
    "hex"         => Hex,         Some("Hex"),          false, Some(format::hex);
    "md5hex"      => Md5Hex,      Some("MD5Hex"),       false, Some(format::md5hex);
    "sha1hex"     => Sha1Hex,     Some("SHA1Hex"),      false, Some(format::sha1hex);
    "sha256hex"   => Sha256Hex,   Some("SHA256Hex"),    false, Some(format::sha256hex);
    "sha384hex"   => Sha384Hex,   Some("SHA384Hex"),    false, Some(format::sha384hex);
    "sha512hex"   => Sha512Hex,   Some("SHA512Hex"),    false, Some(format::sha512hex);
    "e164"        => E164,        Some("E164"),         false, Some(format::e164);
    "emoji"       => Emoji,       Some("Emoji"),        false, Some(format::emoji);
    "time"        => Time,        None,                 false, Some(iso::time_value);

    "enum"        => Enum,        Some("Enum"),         true,  None;
    "default"     => Default,     Some("Default"),      true,  None;
    "prefault"    => Prefault,    Some("Prefault"),     true,  None;
    "refine"      => Refine,      Some("Refine"),       true,  None;
    "check"       => Check,       Some("Check"),        true,  None;
}

impl RuleKind {
    /// The vocabulary entry for this kind.
    pub fn spec(self) -> &'static RuleSpec {
        // `RULES` lists the kinds in declaration order.
        let spec = &RULES[self as usize];
        debug_assert_eq!(spec.kind, self, "vocabulary out of declaration order");
        spec
    }

    /// Schema method appended by the emitter.
    pub fn method(self) -> Option<&'static str> {
        self.spec().method
    }

    /// Whether the rule requires a parameter.
    pub fn takes_param(self) -> bool {
        self.spec().takes_param
    }

    /// Runtime predicate for parameterless checks.
    pub fn predicate(self) -> Option<fn(&Value) -> bool> {
        self.spec().predicate
    }

    /// Whether the rule is a format check delegating to the pattern catalog.
    pub fn is_format(self) -> bool {
        use RuleKind::*;
        matches!(
            self,
            Email | Url | Hostname | Uuid | Guid | Cuid | Cuid2 | NanoId | Ulid | Xid | Ksuid
                | Ipv4 | Ipv6 | CidrV4 | CidrV6 | Base64 | Base64Url | Hex | Md5Hex | Sha1Hex
                | Sha256Hex | Sha384Hex | Sha512Hex | E164 | Emoji
        )
    }

    /// Whether the rule's parameter is a numeric bound.
    pub fn is_numeric_bound(self) -> bool {
        use RuleKind::*;
        matches!(self, Gt | Gte | Lt | Lte | MultipleOf)
    }

    /// Whether the rule's parameter is a size or length.
    pub fn is_size_bound(self) -> bool {
        use RuleKind::*;
        matches!(self, Min | Max | Length | Size)
    }
}
