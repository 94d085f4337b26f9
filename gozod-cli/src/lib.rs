//! # gozod-cli
//!
//! Library behind the `gozodgen` command, which writes gozod `Schema()`
//! methods next to annotated Go structs.
//!
//! ## Architecture
//!
//! - [`config`] - `gozod.toml` loading and flag merging
//! - [`scanner`] - Go package discovery
//! - [`generator`] - Generation and freshness checks over packages
//! - [`writer`] - File output and dry-run support
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{SchemaGenerator, StaleFile, Staleness};
pub use scanner::PackageScanner;
pub use watcher::FileWatcher;
pub use writer::FileWriter;
