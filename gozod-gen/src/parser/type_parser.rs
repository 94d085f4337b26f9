//! Syntactic Go types.
//!
//! [`TypeParser`] lowers a tree-sitter type node into an owned [`GoType`].
//! Rendering a `GoType` with `Display` gives the normalized source spelling
//! used as a field's type expression: `*Node`, `[]*Node`,
//! `map[string]*Node`, `Page[T]`.

use std::fmt;

use tree_sitter::Node;

/// A struct field as written, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoField {
    /// Declared names. Empty for an embedded field.
    pub names: Vec<String>,
    pub ty: GoType,
    /// Decoded tag contents, if a tag is present.
    pub tag: Option<String>,
}

impl GoField {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// An owned Go type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// `name`, `pkg.Name` or `Name[A, B]`.
    Named {
        package: Option<String>,
        name: String,
        args: Vec<GoType>,
    },
    Pointer(Box<GoType>),
    Slice(Box<GoType>),
    /// Fixed-length array; `len` is kept as written, `...` included.
    Array { len: String, elem: Box<GoType> },
    Map { key: Box<GoType>, value: Box<GoType> },
    /// Anonymous struct. The source text is kept for rendering.
    Struct { fields: Vec<GoField>, text: String },
    Interface(String),
    /// Function, channel and any other shape, by source text.
    Other(String),
}

impl GoType {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            package: None,
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                package,
                name,
                args,
            } => {
                if let Some(package) = package {
                    write!(f, "{package}.")?;
                }
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            Self::Pointer(inner) => write!(f, "*{inner}"),
            Self::Slice(inner) => write!(f, "[]{inner}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Struct { text, .. } | Self::Interface(text) | Self::Other(text) => {
                f.write_str(text)
            }
        }
    }
}

/// Lowers tree-sitter type nodes.
pub struct TypeParser;

impl TypeParser {
    /// Lowers a type node. Unrecognized shapes become [`GoType::Other`].
    pub fn parse(node: Node<'_>, source: &str) -> GoType {
        let text = || source[node.byte_range()].to_string();
        match node.kind() {
            "type_identifier" => GoType::named(text()),
            "qualified_type" => match (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                (Some(package), Some(name)) => GoType::Named {
                    package: Some(source[package.byte_range()].to_string()),
                    name: source[name.byte_range()].to_string(),
                    args: Vec::new(),
                },
                _ => GoType::Other(text()),
            },
            "generic_type" => Self::parse_generic(node, source),
            "pointer_type" => match node.named_child(0) {
                Some(inner) => GoType::Pointer(Box::new(Self::parse(inner, source))),
                None => GoType::Other(text()),
            },
            "slice_type" => match node.child_by_field_name("element") {
                Some(elem) => GoType::Slice(Box::new(Self::parse(elem, source))),
                None => GoType::Other(text()),
            },
            "array_type" | "implicit_length_array_type" => {
                let Some(elem) = node.child_by_field_name("element") else {
                    return GoType::Other(text());
                };
                let len = node
                    .child_by_field_name("length")
                    .map_or_else(|| "...".to_string(), |n| source[n.byte_range()].to_string());
                GoType::Array {
                    len,
                    elem: Box::new(Self::parse(elem, source)),
                }
            }
            "map_type" => match (
                node.child_by_field_name("key"),
                node.child_by_field_name("value"),
            ) {
                (Some(key), Some(value)) => GoType::Map {
                    key: Box::new(Self::parse(key, source)),
                    value: Box::new(Self::parse(value, source)),
                },
                _ => GoType::Other(text()),
            },
            "struct_type" => GoType::Struct {
                fields: Self::parse_fields(node, source),
                text: text(),
            },
            "interface_type" => GoType::Interface(text()),
            "parenthesized_type" => match node.named_child(0) {
                Some(inner) => Self::parse(inner, source),
                None => GoType::Other(text()),
            },
            _ => GoType::Other(text()),
        }
    }

    fn parse_generic(node: Node<'_>, source: &str) -> GoType {
        let text = || source[node.byte_range()].to_string();
        let Some(base) = node.child_by_field_name("type") else {
            return GoType::Other(text());
        };
        let GoType::Named { package, name, .. } = Self::parse(base, source) else {
            return GoType::Other(text());
        };

        let mut args = Vec::new();
        if let Some(list) = node.child_by_field_name("type_arguments") {
            let mut cursor = list.walk();
            for arg in list.named_children(&mut cursor) {
                let arg = match arg.kind() {
                    "type_elem" if arg.named_child_count() == 1 => match arg.named_child(0) {
                        Some(inner) => inner,
                        None => arg,
                    },
                    _ => arg,
                };
                if arg.kind() == "comment" {
                    continue;
                }
                args.push(Self::parse(arg, source));
            }
        }
        GoType::Named {
            package,
            name,
            args,
        }
    }

    /// Lowers the fields of a `struct_type` node in declaration order.
    pub fn parse_fields(node: Node<'_>, source: &str) -> Vec<GoField> {
        let mut cursor = node.walk();
        let Some(list) = node
            .named_children(&mut cursor)
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some(ty) = decl.child_by_field_name("type") else {
                continue;
            };
            let mut name_cursor = decl.walk();
            let names = decl
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| source[n.byte_range()].to_string())
                .collect();
            let tag = decl
                .child_by_field_name("tag")
                .and_then(|t| super::struct_tag::unquote(&source[t.byte_range()]));
            fields.push(GoField {
                names,
                ty: Self::parse(ty, source),
                tag,
            });
        }
        fields
    }
}
