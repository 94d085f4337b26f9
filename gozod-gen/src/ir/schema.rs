//! Record and field descriptors.
//!
//! These are the inputs of the code emitter: one [`RecordDescriptor`] per
//! Go struct selected for generation, holding its fields in declaration
//! order.

use gozod::{Rule, RuleKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::types::SemanticType;

/// One exported struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Go field name.
    pub name: String,
    /// Key in the generated schema map.
    pub json_key: String,
    /// Source spelling of the type, e.g. `[]*Node` or `map[string]int`.
    pub type_expression: String,
    pub semantic_type: SemanticType,
    /// The `gozod` tag value as written.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_tag: String,
    /// Parsed `gozod` tag, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    pub required: bool,
    pub nilable: bool,
    /// `!required && (nilable || pointer)`.
    pub optional: bool,
}

impl FieldDescriptor {
    /// Builds a descriptor, deriving the presence flags from `rules`.
    pub fn new(
        name: impl Into<String>,
        json_key: impl Into<String>,
        type_expression: impl Into<String>,
        semantic_type: SemanticType,
        rules: Vec<Rule>,
    ) -> Self {
        let has = |kind| rules.iter().any(|r: &Rule| r.kind() == Some(kind));
        let required = has(RuleKind::Required);
        let nilable = has(RuleKind::Nilable);
        let optional = !required && (nilable || semantic_type.is_pointer());
        Self {
            name: name.into(),
            json_key: json_key.into(),
            type_expression: type_expression.into(),
            semantic_type,
            raw_tag: String::new(),
            rules,
            required,
            nilable,
            optional,
        }
    }

    pub fn with_raw_tag(mut self, raw_tag: impl Into<String>) -> Self {
        self.raw_tag = raw_tag.into();
        self
    }

    /// Whether any rule has the given kind.
    pub fn has_rule(&self, kind: RuleKind) -> bool {
        self.rules.iter().any(|r| r.kind() == Some(kind))
    }
}

/// A struct selected for schema generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    /// Type name without type parameters.
    pub name: String,
    /// Type parameter names, e.g. `["T"]` for `Page[T any]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    /// Go package name.
    pub package: String,
    /// File declaring the struct.
    pub source_file: PathBuf,
    /// Whether the declaration carries the generation directive.
    pub opted_in: bool,
    /// Imports of the declaring file, alias to path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub imports: BTreeMap<String, String>,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// The record as a type, with its parameters applied: `Page[T]`.
    pub fn type_name(&self) -> String {
        if self.type_params.is_empty() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, self.type_params.join(", "))
        }
    }

    /// Whether any field carries a rule of the given kind.
    pub fn uses_rule(&self, kind: RuleKind) -> bool {
        self.fields.iter().any(|f| f.has_rule(kind))
    }

    /// Whether any field involves `time.Time`.
    pub fn uses_time(&self) -> bool {
        self.fields.iter().any(|f| f.semantic_type.contains_time())
    }
}
