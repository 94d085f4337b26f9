//! Base constructor selection.
//!
//! Maps a field's semantic type to the schema constructor it starts from.
//! References back to the enclosing record are detected from the type
//! expression alone and wrapped in a lazy thunk, so self-referential
//! records never build their schema eagerly.

use crate::ir::{FieldDescriptor, RecordDescriptor, SemanticType};

/// Maps field types to schema constructors for one record.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    alias: &'a str,
    record: &'a RecordDescriptor,
}

impl<'a> TypeMapper<'a> {
    pub fn new(alias: &'a str, record: &'a RecordDescriptor) -> Self {
        Self { alias, record }
    }

    /// The lazy wrapper around the enclosing record's schema.
    pub fn lazy(&self) -> String {
        format!(
            "{a}.Lazy(func() {a}.Type[any] {{ return {a}.FromStruct[{}]() }})",
            self.record.type_name(),
            a = self.alias,
        )
    }

    /// Number of slice layers between a field and the enclosing record,
    /// when the type expression reaches the record through pointers and
    /// slices only.
    pub fn self_reference(&self, type_expression: &str) -> Option<usize> {
        let mut rest = type_expression.trim();
        let mut slices = 0;
        loop {
            if let Some(inner) = rest.strip_prefix('*') {
                rest = inner;
            } else if let Some(inner) = rest.strip_prefix("[]") {
                rest = inner;
                slices += 1;
            } else if rest.starts_with('[') {
                let close = rest.find(']')?;
                rest = &rest[close + 1..];
                slices += 1;
            } else {
                break;
            }
        }
        (base_name(rest) == self.record.name).then_some(slices)
    }

    /// The base expression for a field.
    ///
    /// `leaf` replaces the innermost element constructor, looking through
    /// pointers and slices. It is how `enum`, `time` and `uuid` take over
    /// the base.
    pub fn base(&self, field: &FieldDescriptor, leaf: Option<&str>) -> String {
        if let Some(depth) = self.self_reference(&field.type_expression) {
            let mut expr = self.lazy();
            for _ in 0..depth {
                expr = format!("{}.Slice({expr})", self.alias);
            }
            return expr;
        }
        self.constructor(&field.semantic_type, leaf)
    }

    /// The constructor for a semantic type.
    pub fn constructor(&self, ty: &SemanticType, leaf: Option<&str>) -> String {
        let a = self.alias;
        match (ty, leaf) {
            (SemanticType::Pointer(inner), _) => self.constructor(inner, leaf),
            (SemanticType::Slice(inner), _) => {
                format!("{a}.Slice({})", self.constructor(inner, leaf))
            }
            (_, Some(leaf)) => leaf.to_string(),
            (SemanticType::Primitive(kind), None) => format!("{a}.{}()", kind.constructor()),
            (SemanticType::Map { key, value }, None) => format!(
                "{a}.Map({}, {})",
                self.constructor(key, None),
                self.constructor(value, None)
            ),
            (SemanticType::Time, None) => format!("{a}.Time()"),
            (SemanticType::Struct(name), None) if base_name(name) == self.record.name => {
                self.lazy()
            }
            (SemanticType::Struct(name), None) => format!("{a}.FromStruct[{name}]()"),
            (SemanticType::Any, None) => format!("{a}.Any()"),
        }
    }
}

/// The innermost element of a semantic type, through pointers and slices.
pub fn leaf(ty: &SemanticType) -> &SemanticType {
    match ty {
        SemanticType::Pointer(inner) | SemanticType::Slice(inner) => leaf(inner),
        other => other,
    }
}

/// A type name without its type arguments.
fn base_name(name: &str) -> &str {
    name.split('[').next().unwrap_or(name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PrimitiveKind;

    fn record(name: &str, params: &[&str]) -> RecordDescriptor {
        RecordDescriptor {
            name: name.into(),
            type_params: params.iter().map(|p| p.to_string()).collect(),
            package: "models".into(),
            source_file: "models.go".into(),
            opted_in: true,
            imports: Default::default(),
            fields: vec![],
        }
    }

    fn field(expr: &str, ty: SemanticType) -> FieldDescriptor {
        FieldDescriptor::new("F", "f", expr, ty, vec![])
    }

    const LAZY_NODE: &str =
        "schema.Lazy(func() schema.Type[any] { return schema.FromStruct[Node]() })";

    #[test]
    fn test_self_reference_forms() {
        let node = record("Node", &[]);
        let mapper = TypeMapper::new("schema", &node);
        assert_eq!(mapper.self_reference("Node"), Some(0));
        assert_eq!(mapper.self_reference("*Node"), Some(0));
        assert_eq!(mapper.self_reference("[]Node"), Some(1));
        assert_eq!(mapper.self_reference("[]*Node"), Some(1));
        assert_eq!(mapper.self_reference("[][]*Node"), Some(2));
        assert_eq!(mapper.self_reference("map[string]*Node"), None);
        assert_eq!(mapper.self_reference("*NodeList"), None);
        assert_eq!(mapper.self_reference("other.Node"), None);
    }

    #[test]
    fn test_lazy_bases() {
        let node = record("Node", &[]);
        let mapper = TypeMapper::new("schema", &node);
        let next = field("*Node", SemanticType::pointer(SemanticType::Struct("Node".into())));
        assert_eq!(mapper.base(&next, None), LAZY_NODE);

        let children = field(
            "[]*Node",
            SemanticType::slice(SemanticType::pointer(SemanticType::Struct("Node".into()))),
        );
        assert_eq!(mapper.base(&children, None), format!("schema.Slice({LAZY_NODE})"));

        let index = field(
            "map[string]*Node",
            SemanticType::map(
                SemanticType::Primitive(PrimitiveKind::String),
                SemanticType::pointer(SemanticType::Struct("Node".into())),
            ),
        );
        assert_eq!(
            mapper.base(&index, None),
            format!("schema.Map(schema.String(), {LAZY_NODE})")
        );
    }

    #[test]
    fn test_generic_record_lazy() {
        let page = record("Page", &["T"]);
        let mapper = TypeMapper::new("schema", &page);
        assert_eq!(mapper.self_reference("*Page[T]"), Some(0));
        assert_eq!(
            mapper.lazy(),
            "schema.Lazy(func() schema.Type[any] { return schema.FromStruct[Page[T]]() })"
        );
    }

    #[test]
    fn test_constructors() {
        let user = record("User", &[]);
        let mapper = TypeMapper::new("schema", &user);
        let tags = SemanticType::slice(SemanticType::Primitive(PrimitiveKind::String));
        assert_eq!(mapper.constructor(&tags, None), "schema.Slice(schema.String())");
        assert_eq!(
            mapper.constructor(&tags, Some("schema.Enum(\"a\")")),
            "schema.Slice(schema.Enum(\"a\"))"
        );
        assert_eq!(
            mapper.constructor(&SemanticType::Struct("Address".into()), None),
            "schema.FromStruct[Address]()"
        );
        assert_eq!(
            mapper.constructor(&SemanticType::Primitive(PrimitiveKind::Uintptr), None),
            "schema.Uint64()"
        );
        assert_eq!(mapper.constructor(&SemanticType::Any, None), "schema.Any()");
        assert_eq!(
            leaf(&SemanticType::slice(SemanticType::pointer(SemanticType::Time))),
            &SemanticType::Time
        );
    }
}
