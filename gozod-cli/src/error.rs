//! Error types for the CLI.
//!
//! Library errors from `gozod-gen` are wrapped unchanged so that their
//! file, record and field context reaches the user.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during package discovery.
    #[error("Failed to scan for packages: {0}")]
    Scan(#[from] ScanError),

    /// Generation failed for a package.
    #[error(transparent)]
    Generate(#[from] gozod_gen::GenerateError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Generated files are missing or out of date.
    #[error("{count} generated file(s) are stale")]
    Stale { count: usize },

    /// The target file exists and `--force` was not given.
    #[error("{} already exists (use --force to overwrite)", .path.display())]
    AlreadyExists { path: PathBuf },

    /// IR serialization failed.
    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during package discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Path does not exist.
    #[error("Path not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Invalid include pattern.
    #[error("Invalid include pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Error from the directory walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid TOML syntax.
    #[error("Invalid TOML in {}: {message}", .path.display())]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete an orphaned output.
    #[error("Failed to remove {}: {source}", .path.display())]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),
}

impl ScanError {
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl CliError {
    /// Process exit code for this error. Stale output exits with 2 so that
    /// CI can tell it apart from a failed run.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Stale { .. } => 2,
            _ => 1,
        }
    }
}
