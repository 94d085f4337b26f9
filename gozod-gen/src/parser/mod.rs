//! Go source parsing.
//!
//! Source files are parsed with tree-sitter and immediately lowered into
//! owned structures, so no syntax tree outlives its file:
//!
//! - [`SourceParser`] turns a file into a [`GoFile`]
//! - [`type_parser`] lowers type expressions
//! - [`type_index`] resolves them across the package
//! - [`field_parser`] and [`struct_parser`] build the IR

pub mod field_parser;
pub mod struct_parser;
pub mod struct_tag;
pub mod type_index;
pub mod type_parser;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser};

use crate::error::{GenerateError, Result};
use type_parser::{GoType, TypeParser};

/// The directive that opts a declaration in, regardless of tags.
pub const DIRECTIVE_TOOL: &str = "gozodgen";

/// A top-level `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub ty: GoType,
    /// `type A = B`.
    pub is_alias: bool,
    /// Preceded by a `go:generate gozodgen` comment.
    pub opted_in: bool,
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct GoFile {
    pub path: PathBuf,
    pub package: String,
    /// Import alias to import path.
    pub imports: HashMap<String, String>,
    pub decls: Vec<TypeDecl>,
    /// Whether tree-sitter reported syntax errors.
    pub has_errors: bool,
}

/// Parses Go source text. Reusable across files.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, path: &Path, source: &str) -> Result<GoFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| GenerateError::TypeResolutionError {
                file: path.to_path_buf(),
                message: "parser produced no syntax tree".to_string(),
            })?;
        let root = tree.root_node();

        let mut package = None;
        let mut imports = HashMap::new();
        let mut decls = Vec::new();

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "package_clause" => {
                    package = node
                        .named_child(0)
                        .map(|n| source[n.byte_range()].to_string());
                }
                "import_declaration" => collect_imports(node, source, &mut imports),
                "type_declaration" => collect_decls(node, source, &mut decls),
                _ => {}
            }
        }

        let package = package.ok_or_else(|| GenerateError::TypeResolutionError {
            file: path.to_path_buf(),
            message: "missing package clause".to_string(),
        })?;

        Ok(GoFile {
            path: path.to_path_buf(),
            package,
            imports,
            decls,
            has_errors: root.has_error(),
        })
    }
}

fn collect_imports(node: Node<'_>, source: &str, imports: &mut HashMap<String, String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let Some(path) = child
                    .child_by_field_name("path")
                    .and_then(|p| struct_tag::unquote(&source[p.byte_range()]))
                else {
                    continue;
                };
                let alias = match child.child_by_field_name("name") {
                    Some(name) => source[name.byte_range()].to_string(),
                    None => path.rsplit('/').next().unwrap_or(&path).to_string(),
                };
                if alias != "_" && alias != "." {
                    imports.insert(alias, path);
                }
            }
            "import_spec_list" => collect_imports(child, source, imports),
            _ => {}
        }
    }
}

fn collect_decls(node: Node<'_>, source: &str, decls: &mut Vec<TypeDecl>) {
    let decl_opted_in = has_directive(node, source);
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        let is_alias = match spec.kind() {
            "type_spec" => false,
            "type_alias" => true,
            _ => continue,
        };
        let (Some(name), Some(ty)) = (
            spec.child_by_field_name("name"),
            spec.child_by_field_name("type"),
        ) else {
            continue;
        };

        let mut type_params = Vec::new();
        if let Some(list) = spec.child_by_field_name("type_parameters") {
            let mut list_cursor = list.walk();
            for param in list.named_children(&mut list_cursor) {
                let mut name_cursor = param.walk();
                type_params.extend(
                    param
                        .children_by_field_name("name", &mut name_cursor)
                        .map(|n| source[n.byte_range()].to_string()),
                );
            }
        }

        decls.push(TypeDecl {
            name: source[name.byte_range()].to_string(),
            type_params,
            ty: TypeParser::parse(ty, source),
            is_alias,
            opted_in: decl_opted_in || has_directive(spec, source),
        });
    }
}

/// Whether the comments directly above `node` include the directive.
fn has_directive(node: Node<'_>, source: &str) -> bool {
    let mut row = node.start_position().row;
    let mut current = node.prev_sibling();
    while let Some(prev) = current {
        if prev.kind() != "comment" || prev.end_position().row + 1 != row {
            break;
        }
        let text = &source[prev.byte_range()];
        if text.starts_with("//") && text.contains("go:generate") && text.contains(DIRECTIVE_TOOL) {
            return true;
        }
        row = prev.start_position().row;
        current = prev.prev_sibling();
    }
    false
}
