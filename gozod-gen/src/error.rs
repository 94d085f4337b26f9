//! Error types for the generator crate.
//!
//! Every variant names as much location as is known: the source file, the
//! record and the field.

use gozod::TagError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation.
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Error that aborted generation for a package.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A field's `gozod` tag did not parse.
    #[error("{}: {record}.{field}: invalid gozod tag: {source}", .file.display())]
    FieldError {
        file: PathBuf,
        record: String,
        field: String,
        #[source]
        source: TagError,
    },

    /// The syntax tree could not be interpreted.
    #[error("{}: cannot resolve types: {message}", .file.display())]
    TypeResolutionError { file: PathBuf, message: String },

    /// A field's rules could not be rendered.
    #[error("{}: {record}.{field}: {source}", .file.display())]
    EmissionError {
        file: PathBuf,
        record: String,
        field: String,
        #[source]
        source: EmissionError,
    },

    /// The Go grammar could not be loaded.
    #[error("failed to load the Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a single field could not be emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmissionError {
    #[error("unknown rule '{rule}'")]
    UnknownRule { rule: String },

    #[error("rule '{rule}' cannot render a literal for {type_expression}: {reason}")]
    UnsupportedLiteral {
        rule: String,
        type_expression: String,
        reason: String,
    },

    #[error("rule '{rule}' has invalid parameter '{param}': {reason}")]
    InvalidParam {
        rule: String,
        param: String,
        reason: String,
    },

    /// The rule's qualifier does not exist on the field's schema.
    #[error("rule '{rule}' does not apply to {type_expression}")]
    InapplicableRule {
        rule: String,
        type_expression: String,
    },
}

impl EmissionError {
    /// Attaches file, record and field context.
    pub(crate) fn at(self, file: impl Into<PathBuf>, record: &str, field: &str) -> GenerateError {
        GenerateError::EmissionError {
            file: file.into(),
            record: record.to_string(),
            field: field.to_string(),
            source: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_location() {
        let err = EmissionError::UnknownRule {
            rule: "bogus".into(),
        }
        .at("models/user.go", "User", "Name");
        assert_eq!(
            err.to_string(),
            "models/user.go: User.Name: unknown rule 'bogus'"
        );

        let err = GenerateError::FieldError {
            file: "a.go".into(),
            record: "A".into(),
            field: "B".into(),
            source: TagError::RuleRequiresParam { rule: "min".into() },
        };
        assert_eq!(
            err.to_string(),
            "a.go: A.B: invalid gozod tag: rule 'min' requires a parameter"
        );
    }
}
