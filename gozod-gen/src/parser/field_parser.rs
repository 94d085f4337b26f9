//! Field model: lowering struct fields into [`FieldDescriptor`]s.

use convert_case::{Case, Casing};
use gozod::{parse_tag, TagError};
use tracing::trace;

use super::struct_tag;
use super::type_index::{Scope, TypeIndex};
use super::type_parser::GoField;
use crate::ir::FieldDescriptor;

/// Struct tag key holding the rules.
pub const TAG_KEY: &str = "gozod";

/// A field whose `gozod` tag did not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field '{field}': {source}")]
pub struct FieldParseError {
    pub field: String,
    #[source]
    pub source: TagError,
}

/// What the field parser needs to know about the enclosing record.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub index: &'a TypeIndex,
    pub scope: &'a Scope,
    /// Include untagged fields too.
    pub opted_in: bool,
}

/// Lowers struct fields.
pub struct FieldParser;

impl FieldParser {
    /// Lowers one declaration, which may name several fields.
    ///
    /// Unexported and embedded fields are skipped, as are fields tagged
    /// `gozod:"-"` and, unless the record opted in, untagged fields.
    pub fn parse(
        field: &GoField,
        ctx: FieldContext<'_>,
    ) -> Result<Vec<FieldDescriptor>, FieldParseError> {
        let tag = field.tag.as_deref().unwrap_or_default();
        let gozod = struct_tag::lookup(tag, TAG_KEY);
        if gozod.as_deref() == Some("-") {
            return Ok(Vec::new());
        }
        if gozod.is_none() && !ctx.opted_in {
            return Ok(Vec::new());
        }
        let raw_tag = gozod.unwrap_or_default();

        let mut descriptors = Vec::new();
        for name in field.names.iter().filter(|n| is_exported(n)) {
            let rules = parse_tag(&raw_tag).map_err(|source| FieldParseError {
                field: name.clone(),
                source,
            })?;
            let json_key = json_key(tag, name);
            let semantic_type = ctx.index.resolve(&field.ty, ctx.scope);

            trace!(field = %name, json_key = %json_key, rules = rules.len(), "lowered field");
            descriptors.push(
                FieldDescriptor::new(
                    name.clone(),
                    json_key,
                    field.ty.to_string(),
                    semantic_type,
                    rules,
                )
                .with_raw_tag(raw_tag.clone()),
            );
        }
        Ok(descriptors)
    }
}

/// Go exports identifiers that start with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// The schema key: the `json` tag's name, else the camel-cased Go name.
fn json_key(tag: &str, go_name: &str) -> String {
    struct_tag::lookup(tag, "json")
        .and_then(|value| value.split(',').next().map(str::to_string))
        .filter(|key| !key.is_empty() && key != "-")
        .unwrap_or_else(|| go_name.to_case(Case::Camel))
}
