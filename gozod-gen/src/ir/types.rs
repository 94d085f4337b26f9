//! Semantic type definitions.
//!
//! A [`SemanticType`] is what a Go field type means for schema purposes,
//! after named types have been looked through. The syntactic spelling is
//! kept separately on the field as its type expression.

use serde::{Deserialize, Serialize};

/// Go's predeclared scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl PrimitiveKind {
    /// Recognizes a predeclared type name, including the `byte` and `rune`
    /// aliases.
    pub fn from_go_name(name: &str) -> Option<Self> {
        use PrimitiveKind::*;
        Some(match name {
            "string" => String,
            "bool" => Bool,
            "int" => Int,
            "int8" => Int8,
            "int16" => Int16,
            "int32" | "rune" => Int32,
            "int64" => Int64,
            "uint" => Uint,
            "uint8" | "byte" => Uint8,
            "uint16" => Uint16,
            "uint32" => Uint32,
            "uint64" => Uint64,
            "uintptr" => Uintptr,
            "float32" => Float32,
            "float64" => Float64,
            "complex64" => Complex64,
            "complex128" => Complex128,
            _ => return None,
        })
    }

    /// The canonical Go spelling.
    pub fn go_name(self) -> &'static str {
        use PrimitiveKind::*;
        match self {
            String => "string",
            Bool => "bool",
            Int => "int",
            Int8 => "int8",
            Int16 => "int16",
            Int32 => "int32",
            Int64 => "int64",
            Uint => "uint",
            Uint8 => "uint8",
            Uint16 => "uint16",
            Uint32 => "uint32",
            Uint64 => "uint64",
            Uintptr => "uintptr",
            Float32 => "float32",
            Float64 => "float64",
            Complex64 => "complex64",
            Complex128 => "complex128",
        }
    }

    /// Name of the schema constructor for this kind.
    pub fn constructor(self) -> &'static str {
        use PrimitiveKind::*;
        match self {
            String => "String",
            Bool => "Bool",
            Int => "Int",
            Int8 => "Int8",
            Int16 => "Int16",
            Int32 => "Int32",
            Int64 => "Int64",
            Uint => "Uint",
            Uint8 => "Uint8",
            Uint16 => "Uint16",
            Uint32 => "Uint32",
            Uint64 | Uintptr => "Uint64",
            Float32 => "Float32",
            Float64 => "Float64",
            Complex64 => "Complex64",
            Complex128 => "Complex128",
        }
    }

    pub fn is_integer(self) -> bool {
        use PrimitiveKind::*;
        matches!(
            self,
            Int | Int8 | Int16 | Int32 | Int64 | Uint | Uint8 | Uint16 | Uint32 | Uint64 | Uintptr
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, PrimitiveKind::Complex64 | PrimitiveKind::Complex128)
    }

    /// Integer, float or complex.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }
}

/// Resolved meaning of a field type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SemanticType {
    Primitive(PrimitiveKind),
    Pointer(Box<SemanticType>),
    /// Slices and fixed-length arrays.
    Slice(Box<SemanticType>),
    Map {
        key: Box<SemanticType>,
        value: Box<SemanticType>,
    },
    /// The standard time-of-day type, `time.Time`.
    Time,
    /// A struct declared in the same package, by its Go spelling.
    Struct(String),
    /// Interfaces, type parameters, foreign types and anything unresolved.
    Any,
}

impl SemanticType {
    pub fn pointer(inner: SemanticType) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn slice(inner: SemanticType) -> Self {
        Self::Slice(Box::new(inner))
    }

    pub fn map(key: SemanticType, value: SemanticType) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Strips any number of pointer layers.
    pub fn pointee(&self) -> &SemanticType {
        match self {
            Self::Pointer(inner) => inner.pointee(),
            other => other,
        }
    }

    /// The primitive kind after stripping pointers.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self.pointee() {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Whether the time-of-day marker appears anywhere in this type.
    pub fn contains_time(&self) -> bool {
        match self {
            Self::Time => true,
            Self::Pointer(inner) | Self::Slice(inner) => inner.contains_time(),
            Self::Map { key, value } => key.contains_time() || value.contains_time(),
            _ => false,
        }
    }

    /// Go spelling of this type, used for composite literals.
    pub fn go_type(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.go_name().to_string(),
            Self::Pointer(inner) => format!("*{}", inner.go_type()),
            Self::Slice(inner) => format!("[]{}", inner.go_type()),
            Self::Map { key, value } => format!("map[{}]{}", key.go_type(), value.go_type()),
            Self::Time => "time.Time".to_string(),
            Self::Struct(name) => name.clone(),
            Self::Any => "any".to_string(),
        }
    }
}
