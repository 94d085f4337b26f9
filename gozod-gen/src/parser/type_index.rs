//! Package-wide type index and semantic resolution.
//!
//! Every `type` declaration of a package is recorded so that a field type
//! naming another declaration, possibly from a different file, resolves
//! through its underlying type. The only foreign type given meaning is
//! the standard library's `time.Time`.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::type_parser::GoType;
use crate::ir::{PrimitiveKind, SemanticType};

const TIME_PACKAGE: &str = "time";

/// Names visible while resolving one type expression.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Import aliases in the declaring file that refer to the `time` package.
    pub time_aliases: HashSet<String>,
    /// Type parameters of the enclosing declaration.
    pub type_params: Vec<String>,
}

impl Scope {
    /// Builds a scope from a file's import table (alias to import path).
    pub fn new(imports: &HashMap<String, String>, type_params: &[String]) -> Self {
        Self {
            time_aliases: imports
                .iter()
                .filter(|(_, path)| path.as_str() == TIME_PACKAGE)
                .map(|(alias, _)| alias.clone())
                .collect(),
            type_params: type_params.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    ty: GoType,
    scope: Scope,
}

/// Index of a package's type declarations.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    entries: HashMap<String, Entry>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declaration. A later declaration of the same name wins.
    pub fn insert(&mut self, name: impl Into<String>, ty: GoType, scope: Scope) {
        self.entries.insert(name.into(), Entry { ty, scope });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` is declared as a struct in this package.
    pub fn is_struct(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|e| matches!(e.ty, GoType::Struct { .. }))
    }

    /// Resolves a type expression to its semantic type.
    ///
    /// Unknown names and shapes degrade to [`SemanticType::Any`]; resolution
    /// never fails.
    pub fn resolve(&self, ty: &GoType, scope: &Scope) -> SemanticType {
        let resolved = self.resolve_inner(ty, scope, &mut Vec::new());
        trace!(ty = %ty, resolved = ?resolved, "resolved type");
        resolved
    }

    fn resolve_inner(&self, ty: &GoType, scope: &Scope, visiting: &mut Vec<String>) -> SemanticType {
        match ty {
            GoType::Named {
                package: Some(package),
                name,
                ..
            } => {
                if name == "Time" && scope.time_aliases.contains(package) {
                    SemanticType::Time
                } else {
                    SemanticType::Any
                }
            }
            GoType::Named {
                package: None,
                name,
                ..
            } => {
                if scope.type_params.iter().any(|p| p == name) {
                    return SemanticType::Any;
                }
                if let Some(entry) = self.entries.get(name) {
                    if let GoType::Struct { .. } = entry.ty {
                        return SemanticType::Struct(ty.to_string());
                    }
                    if visiting.iter().any(|v| v == name) {
                        return SemanticType::Any;
                    }
                    visiting.push(name.clone());
                    let resolved = self.resolve_inner(&entry.ty, &entry.scope, visiting);
                    visiting.pop();
                    return resolved;
                }
                match PrimitiveKind::from_go_name(name) {
                    Some(kind) => SemanticType::Primitive(kind),
                    None => SemanticType::Any,
                }
            }
            GoType::Pointer(inner) => {
                SemanticType::pointer(self.resolve_inner(inner, scope, visiting))
            }
            GoType::Slice(elem) | GoType::Array { elem, .. } => {
                SemanticType::slice(self.resolve_inner(elem, scope, visiting))
            }
            GoType::Map { key, value } => SemanticType::map(
                self.resolve_inner(key, scope, visiting),
                self.resolve_inner(value, scope, visiting),
            ),
            GoType::Struct { .. } | GoType::Interface(_) | GoType::Other(_) => SemanticType::Any,
        }
    }
}
