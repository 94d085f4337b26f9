//! Package resolution.
//!
//! Drives one package directory through the pipeline: every eligible source
//! file is parsed, the package type index is built from all of them, and
//! then each file's records are lowered and emitted. Any error aborts the
//! package; tree-sitter syntax errors are only logged.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GenerateError, Result};
use crate::generator::{CodeGenerator, GeneratorConfig, GoEmitter};
use crate::ir::RecordDescriptor;
use crate::parser::struct_parser::StructParser;
use crate::parser::{GoFile, SourceParser};

/// Output for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// The source file the records were declared in.
    pub source: PathBuf,
    /// Where the generated code belongs.
    pub path: PathBuf,
    pub contents: String,
    /// Names of the records covered, in declaration order.
    pub records: Vec<String>,
}

/// Resolves packages into generated files.
pub struct Resolver {
    parser: SourceParser,
    emitter: GoEmitter,
    config: GeneratorConfig,
}

impl Resolver {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Ok(Self {
            parser: SourceParser::new()?,
            emitter: GoEmitter::new(),
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Lists the records of a package directory, grouped by source file.
    pub fn describe_package(&mut self, dir: &Path) -> Result<Vec<(PathBuf, Vec<RecordDescriptor>)>> {
        let files = self.load_package(dir)?;
        let index = StructParser::index(&files);
        debug!(dir = %dir.display(), files = files.len(), types = index.len(), "indexed package");

        let mut out = Vec::new();
        for file in &files {
            let records = StructParser::parse_file(file, &index)?;
            if !records.is_empty() {
                out.push((file.path.clone(), records));
            }
        }
        Ok(out)
    }

    /// Generates one file per source file that declares records.
    pub fn generate_package(&mut self, dir: &Path) -> Result<Vec<GeneratedFile>> {
        let described = self.describe_package(dir)?;
        let generated = described
            .into_iter()
            .map(|(source, records)| self.emit(source, &records))
            .collect::<Result<Vec<_>>>()?;
        debug!(dir = %dir.display(), outputs = generated.len(), "generated package");
        Ok(generated)
    }

    /// Generates output for a single in-memory source file, treated as a
    /// package of its own.
    pub fn generate_source(&mut self, path: &Path, source: &str) -> Result<Option<GeneratedFile>> {
        let file = self.parser.parse(path, source)?;
        if file.has_errors {
            warn!(file = %path.display(), "syntax errors, continuing with partial tree");
        }
        let files = [file];
        let index = StructParser::index(&files);
        let records = StructParser::parse_file(&files[0], &index)?;
        if records.is_empty() {
            return Ok(None);
        }
        self.emit(path.to_path_buf(), &records).map(Some)
    }

    fn emit(&self, source: PathBuf, records: &[RecordDescriptor]) -> Result<GeneratedFile> {
        let code = self.emitter.generate_file(records, &self.config)?;
        Ok(GeneratedFile {
            path: self.config.output_path(&source),
            source,
            contents: code.code,
            records: code.records,
        })
    }

    /// Parses the eligible files of a package, sorted by name.
    fn load_package(&mut self, dir: &Path) -> Result<Vec<GoFile>> {
        let entries = fs::read_dir(dir).map_err(|e| GenerateError::io(dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| GenerateError::io(dir, e))?.path();
            if self.is_candidate(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let source = fs::read_to_string(&path).map_err(|e| GenerateError::io(&path, e))?;
            if is_generated(&source) {
                debug!(file = %path.display(), "skipping generated file");
                continue;
            }
            let file = self.parser.parse(&path, &source)?;
            if file.package.ends_with("_test") {
                continue;
            }
            if file.has_errors {
                warn!(file = %path.display(), "syntax errors, continuing with partial tree");
            }
            files.push(file);
        }
        Ok(files)
    }

    fn is_candidate(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        path.is_file()
            && name.ends_with(".go")
            && !name.ends_with("_test.go")
            && !self.config.is_output_name(path)
    }
}

/// Whether a file carries Go's generated-code header: a line comment
/// before the package clause.
pub fn is_generated(source: &str) -> bool {
    source
        .lines()
        .map(str::trim_end)
        .take_while(|line| !line.trim_start().starts_with("package "))
        .any(|line| line.starts_with("// Code generated ") && line.ends_with(" DO NOT EDIT."))
}
