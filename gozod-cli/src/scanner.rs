//! Package discovery.
//!
//! Walks the given paths for Go packages, respecting `.gitignore` and an
//! optional include glob. A package is a directory holding at least one
//! non-test `.go` file. Directories the Go tool ignores (`testdata`,
//! `vendor`, and names starting with `.` or `_`) are never entered.

use crate::error::{CliResult, ScanError};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// `*` stops at path separators; `**` crosses them.
const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Scanner for discovering Go package directories.
#[derive(Debug)]
pub struct PackageScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// Descend into subdirectories.
    recursive: bool,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob filter, matched against paths relative to the root.
    filter: Option<glob::Pattern>,
}

impl PackageScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: true,
            respect_gitignore: true,
            filter: None,
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set a glob filter pattern for source files.
    ///
    /// A package is only reported when one of its files matches.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Returns the package directories under the root, sorted.
    ///
    /// A root that names a `.go` file yields the file's directory.
    pub fn scan(&self) -> CliResult<Vec<PathBuf>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }
        if self.root.is_file() {
            let dir = match self.root.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            return Ok(if is_source_file(&self.root) { vec![dir] } else { Vec::new() });
        }

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .hidden(false)
            .max_depth(if self.recursive { None } else { Some(1) })
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_some_and(|t| t.is_dir())
                    || !is_skipped_dir(entry.file_name().to_str().unwrap_or_default())
            })
            .build();

        let mut packages = BTreeSet::new();
        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || !is_source_file(path) {
                continue;
            }

            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path_with(&self.relative_path(path), MATCH_OPTIONS) {
                    continue;
                }
            }

            if let Some(parent) = path.parent() {
                packages.insert(parent.to_path_buf());
            }
        }

        tracing::debug!(root = %self.root.display(), packages = packages.len(), "scanned");
        Ok(packages.into_iter().collect())
    }

    /// Get the relative path from root.
    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A `.go` file that is not a test file.
fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".go") && !n.ends_with("_test.go"))
}

fn is_skipped_dir(name: &str) -> bool {
    name == "testdata" || name == "vendor" || name.starts_with('.') || name.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("main.go"), "package main\n").unwrap();
        fs::create_dir_all(root.join("models/internal")).unwrap();
        fs::write(root.join("models/user.go"), "package models\n").unwrap();
        fs::write(root.join("models/internal/x.go"), "package internal\n").unwrap();

        // Not packages.
        fs::create_dir_all(root.join("only_tests")).unwrap();
        fs::write(root.join("only_tests/a_test.go"), "package x\n").unwrap();
        fs::create_dir_all(root.join("testdata")).unwrap();
        fs::write(root.join("testdata/t.go"), "package t\n").unwrap();
        fs::create_dir_all(root.join("vendor/lib")).unwrap();
        fs::write(root.join("vendor/lib/l.go"), "package lib\n").unwrap();
        fs::write(root.join("README.md"), "# Test").unwrap();

        dir
    }

    fn relative(dir: &TempDir, packages: &[PathBuf]) -> Vec<String> {
        packages
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_finds_packages() {
        let dir = create_test_dir();
        let packages = PackageScanner::new(dir.path()).scan().unwrap();
        assert_eq!(relative(&dir, &packages), vec!["", "models", "models/internal"]);
    }

    #[test]
    fn test_scan_non_recursive() {
        let dir = create_test_dir();
        let packages = PackageScanner::new(dir.path())
            .with_recursive(false)
            .scan()
            .unwrap();
        assert_eq!(relative(&dir, &packages), vec![""]);
    }

    #[test]
    fn test_scan_with_filter() {
        let dir = create_test_dir();
        let packages = PackageScanner::new(dir.path())
            .with_filter("models/*.go")
            .unwrap()
            .scan()
            .unwrap();
        assert_eq!(relative(&dir, &packages), vec!["models"]);
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let dir = create_test_dir();
        fs::write(dir.path().join(".gitignore"), "models/internal/\n").unwrap();
        let packages = PackageScanner::new(dir.path()).scan().unwrap();
        assert_eq!(relative(&dir, &packages), vec!["", "models"]);

        let packages = PackageScanner::new(dir.path())
            .with_gitignore(false)
            .scan()
            .unwrap();
        assert_eq!(packages.len(), 3);
    }

    #[test]
    fn test_scan_file_root() {
        let dir = create_test_dir();
        let packages = PackageScanner::new(dir.path().join("models/user.go"))
            .scan()
            .unwrap();
        assert_eq!(packages, vec![dir.path().join("models")]);
    }

    #[test]
    fn test_invalid_filter() {
        assert!(matches!(
            PackageScanner::new(".").with_filter("[").unwrap_err(),
            ScanError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let result = PackageScanner::new("/nonexistent/path").scan();
        assert!(matches!(
            result.unwrap_err(),
            crate::error::CliError::Scan(ScanError::NotFound { .. })
        ));
    }
}
