//! Output of generated Go files.
//!
//! Contents are staged next to the target and renamed into place, so a
//! watcher or a concurrent `go build` never reads a half-written file.
//! Files that already hold the same bytes are left untouched, which keeps
//! regeneration of an unchanged package from retriggering a watcher.

use crate::error::{CliResult, WriteError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happened to one output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// The file did not exist and was created.
    Created { path: PathBuf, bytes: usize },
    /// The file existed with other contents and was replaced.
    Updated { path: PathBuf, bytes: usize },
    /// The file already held these contents.
    Unchanged { path: PathBuf },
    /// An orphaned output was deleted.
    Removed { path: PathBuf },
    /// Dry run: the file would have been created or replaced.
    DryRun { path: PathBuf, content: String },
    /// Dry run: the orphaned output would have been deleted.
    WouldRemove { path: PathBuf },
}

/// Writes generated files, or reports what it would write.
#[derive(Debug, Clone, Copy)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Writes `content` to `path` unless the file already holds it.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        let existing = match fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(write_error(path, e)),
        };
        if existing.as_deref() == Some(content.as_bytes()) {
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                path: path.to_path_buf(),
                content: content.to_string(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let staging = staging_path(path);
        if let Err(e) = fs::write(&staging, content).and_then(|()| fs::rename(&staging, path)) {
            let _ = fs::remove_file(&staging);
            return Err(write_error(path, e));
        }
        debug!(path = %path.display(), bytes = content.len(), "wrote");

        let bytes = content.len();
        let path = path.to_path_buf();
        Ok(match existing {
            Some(_) => WriteResult::Updated { path, bytes },
            None => WriteResult::Created { path, bytes },
        })
    }

    /// Deletes an output whose source no longer declares records.
    pub fn remove(&self, path: &Path) -> CliResult<WriteResult> {
        let path_buf = path.to_path_buf();
        if self.dry_run {
            return Ok(WriteResult::WouldRemove { path: path_buf });
        }
        fs::remove_file(path).map_err(|e| WriteError::RemoveFile {
            path: path_buf.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), "removed");
        Ok(WriteResult::Removed { path: path_buf })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Created { path, .. }
            | WriteResult::Updated { path, .. }
            | WriteResult::Unchanged { path }
            | WriteResult::Removed { path }
            | WriteResult::DryRun { path, .. }
            | WriteResult::WouldRemove { path } => path,
        }
    }

    /// Whether the file on disk changed.
    pub fn was_written(&self) -> bool {
        matches!(
            self,
            WriteResult::Created { .. } | WriteResult::Updated { .. } | WriteResult::Removed { .. }
        )
    }

    /// Bytes put on disk; zero when nothing was written.
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Created { bytes, .. } | WriteResult::Updated { bytes, .. } => *bytes,
            _ => 0,
        }
    }
}

/// `models/user_gen.go` stages as `models/.user_gen.go.tmp`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn write_error(path: &Path, source: io::Error) -> crate::error::CliError {
    WriteError::WriteFile {
        path: path.to_path_buf(),
        source,
    }
    .into()
}
