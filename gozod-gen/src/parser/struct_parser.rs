//! Record selection and lowering.
//!
//! A struct declaration becomes a [`RecordDescriptor`] when it carries the
//! generation directive or when any of its fields has a `gozod` tag.

use tracing::debug;

use super::field_parser::{FieldContext, FieldParser, TAG_KEY};
use super::struct_tag;
use super::type_index::{Scope, TypeIndex};
use super::type_parser::{GoField, GoType};
use super::{GoFile, TypeDecl};
use crate::error::{GenerateError, Result};
use crate::ir::RecordDescriptor;

/// Lowers struct declarations into records.
pub struct StructParser;

impl StructParser {
    /// Indexes every type declaration of a package.
    pub fn index(files: &[GoFile]) -> TypeIndex {
        let mut index = TypeIndex::new();
        for file in files {
            for decl in &file.decls {
                let scope = Scope::new(&file.imports, &decl.type_params);
                index.insert(decl.name.clone(), decl.ty.clone(), scope);
            }
        }
        index
    }

    /// Returns the records declared in `file`, in declaration order.
    pub fn parse_file(file: &GoFile, index: &TypeIndex) -> Result<Vec<RecordDescriptor>> {
        let mut records = Vec::new();
        for decl in &file.decls {
            if let Some(record) = Self::parse_decl(file, decl, index)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn parse_decl(
        file: &GoFile,
        decl: &TypeDecl,
        index: &TypeIndex,
    ) -> Result<Option<RecordDescriptor>> {
        let GoType::Struct { fields, .. } = &decl.ty else {
            return Ok(None);
        };
        if decl.is_alias || !(decl.opted_in || fields.iter().any(has_gozod_tag)) {
            return Ok(None);
        }

        let scope = Scope::new(&file.imports, &decl.type_params);
        let ctx = FieldContext {
            index,
            scope: &scope,
            opted_in: decl.opted_in,
        };

        let mut descriptors = Vec::new();
        for field in fields.iter().filter(|f| !f.is_embedded()) {
            let lowered = FieldParser::parse(field, ctx).map_err(|e| GenerateError::FieldError {
                file: file.path.clone(),
                record: decl.name.clone(),
                field: e.field,
                source: e.source,
            })?;
            descriptors.extend(lowered);
        }

        debug!(
            record = %decl.name,
            file = %file.path.display(),
            fields = descriptors.len(),
            opted_in = decl.opted_in,
            "collected record"
        );

        Ok(Some(RecordDescriptor {
            name: decl.name.clone(),
            type_params: decl.type_params.clone(),
            package: file.package.clone(),
            source_file: file.path.clone(),
            opted_in: decl.opted_in,
            imports: file
                .imports
                .iter()
                .map(|(alias, path)| (alias.clone(), path.clone()))
                .collect(),
            fields: descriptors,
        }))
    }
}

fn has_gozod_tag(field: &GoField) -> bool {
    field
        .tag
        .as_deref()
        .is_some_and(|tag| struct_tag::lookup(tag, TAG_KEY).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{PrimitiveKind, SemanticType};
    use crate::parser::SourceParser;
    use std::path::Path;

    fn records(sources: &[&str]) -> Result<Vec<RecordDescriptor>> {
        let mut parser = SourceParser::new()?;
        let files = sources
            .iter()
            .enumerate()
            .map(|(i, src)| parser.parse(Path::new(&format!("f{i}.go")), src))
            .collect::<Result<Vec<_>>>()?;
        let index = StructParser::index(&files);
        let mut out = Vec::new();
        for file in &files {
            out.extend(StructParser::parse_file(file, &index)?);
        }
        Ok(out)
    }

    #[test]
    fn test_selects_tagged_and_marked_structs() {
        let out = records(&[r#"package models

type Plain struct {
	Name string
}

type Tagged struct {
	Name  string `gozod:"required"`
	Extra string
}

//go:generate gozodgen
type Marked struct {
	Name    string
	private int
}

type NotAStruct string
"#])
        .unwrap();
        let names: Vec<_> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tagged", "Marked"]);
        assert_eq!(out[0].fields.len(), 1);
        assert_eq!(out[1].fields.len(), 1);
        assert_eq!(out[1].fields[0].json_key, "name");
        assert_eq!(out[0].package, "models");
    }

    #[test]
    fn test_resolves_types_across_files() {
        let out = records(&[
            r#"package models

import "time"

type Event struct {
	At    time.Time `gozod:"required"`
	Level Level     `gozod:"required"`
	Where Address   `gozod:"required"`
}
"#,
            "package models\n\ntype Level int8\n\ntype Address struct{ City string }\n",
        ])
        .unwrap();
        let fields = &out[0].fields;
        assert_eq!(fields[0].semantic_type, SemanticType::Time);
        assert_eq!(
            fields[1].semantic_type,
            SemanticType::Primitive(PrimitiveKind::Int8)
        );
        assert_eq!(fields[2].semantic_type, SemanticType::Struct("Address".into()));
    }

    #[test]
    fn test_generic_record() {
        let out = records(&[r#"package models

//go:generate gozodgen
type Page[T any] struct {
	Items []T
	Total int `json:"total"`
}
"#])
        .unwrap();
        assert_eq!(out[0].type_name(), "Page[T]");
        assert_eq!(
            out[0].fields[0].semantic_type,
            SemanticType::slice(SemanticType::Any)
        );
    }

    #[test]
    fn test_embedded_fields_are_skipped() {
        let out = records(&[r#"package models

type Base struct{ ID string }

//go:generate gozodgen
type User struct {
	Base
	*Other
	Name string
}
"#])
        .unwrap();
        assert_eq!(out[0].fields.len(), 1);
    }

    #[test]
    fn test_tag_error_names_record_and_field() {
        let err = records(&["package models\n\ntype A struct {\n\tB string `gozod:\"min=\"`\n}\n"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "f0.go: A.B: invalid gozod tag: rule 'min' requires a parameter"
        );
    }
}
