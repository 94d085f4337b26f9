//! Code generator trait and configuration.
//!
//! A [`CodeGenerator`] turns the records of one source file into the text of
//! one generated file. The configuration is immutable once built and is
//! shared by every file of a run.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ir::RecordDescriptor;

/// Default suffix of generated files.
pub const DEFAULT_SUFFIX: &str = "_gen.go";

/// Default import path of the schema runtime.
pub const DEFAULT_SCHEMA_PACKAGE: &str = "github.com/kaptinlin/gozod";

/// Default name the generated code refers to the runtime by.
pub const DEFAULT_SCHEMA_ALIAS: &str = "schema";

/// Marker line that identifies generated files.
pub const GENERATED_MARKER: &str = "// Code generated by gozodgen. DO NOT EDIT.";

/// Trait for schema code generators.
pub trait CodeGenerator: Send + Sync {
    /// Short identifier, e.g. `"go"`.
    fn id(&self) -> &'static str;

    /// Extension of generated files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Generates the schema method for one record.
    fn generate_record(&self, record: &RecordDescriptor, config: &GeneratorConfig)
        -> Result<String>;

    /// Generates a complete file for records declared in the same source
    /// file, in order.
    fn generate_file(
        &self,
        records: &[RecordDescriptor],
        config: &GeneratorConfig,
    ) -> Result<GeneratedCode>;
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Appended to a source file's stem to name its output.
    pub suffix: String,

    /// Package clause of generated files. Defaults to the source package.
    pub package_override: Option<String>,

    /// Build constraints, joined with `&&` into one `//go:build` line.
    pub build_tags: Vec<String>,

    /// Import path of the schema runtime.
    pub schema_package: String,

    /// Import alias of the schema runtime.
    pub schema_alias: String,

    /// Report outputs without writing them.
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            package_override: None,
            build_tags: Vec::new(),
            schema_package: DEFAULT_SCHEMA_PACKAGE.to_string(),
            schema_alias: DEFAULT_SCHEMA_ALIAS.to_string(),
            dry_run: false,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package_override = Some(package.into());
        self
    }

    pub fn with_build_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_schema_package(mut self, path: impl Into<String>) -> Self {
        self.schema_package = path.into();
        self
    }

    pub fn with_schema_alias(mut self, alias: impl Into<String>) -> Self {
        self.schema_alias = alias.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The `//go:build` line, when tags are configured.
    pub fn build_constraint(&self) -> Option<String> {
        let tags: Vec<&str> = self
            .build_tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        (!tags.is_empty()).then(|| format!("//go:build {}", tags.join(" && ")))
    }

    /// Output path for a source file: `user.go` becomes `user_gen.go`.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        source.with_file_name(format!("{stem}{}", self.suffix))
    }

    /// Whether a file name carries the output suffix.
    pub fn is_output_name(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&self.suffix))
    }
}

/// A generated file's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    /// Records covered, in emission order.
    pub records: Vec<String>,
    /// Import paths of the file.
    pub imports: Vec<String>,
}

impl GeneratedCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            records: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn with_records(mut self, records: Vec<String>) -> Self {
        self.records = records;
        self
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.suffix, "_gen.go");
        assert_eq!(config.schema_alias, "schema");
        assert_eq!(config.build_constraint(), None);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_output_path() {
        let config = GeneratorConfig::new();
        assert_eq!(
            config.output_path(Path::new("models/user.go")),
            PathBuf::from("models/user_gen.go")
        );
        let config = config.with_suffix(".zod.go");
        assert_eq!(
            config.output_path(Path::new("user.go")),
            PathBuf::from("user.zod.go")
        );
        assert!(config.is_output_name(Path::new("a/user.zod.go")));
        assert!(!config.is_output_name(Path::new("a/user.go")));
    }

    #[test]
    fn test_build_constraint() {
        let config = GeneratorConfig::new().with_build_tags(["linux", " ", "cgo"]);
        assert_eq!(config.build_constraint().as_deref(), Some("//go:build linux && cgo"));
    }
}
