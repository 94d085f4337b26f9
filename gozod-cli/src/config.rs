//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `gozod.toml` files
//! and merging with command-line arguments. Flags always win.

use crate::error::{CliResult, ConfigError};
use gozod_gen::generator::{DEFAULT_SCHEMA_ALIAS, DEFAULT_SCHEMA_PACKAGE, DEFAULT_SUFFIX};
use gozod_gen::GeneratorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "gozod.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    pub build: BuildConfig,
    pub schema: SchemaConfig,
    pub scan: ScanConfig,
}

/// Where and how generated files are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Appended to a source file's stem.
    pub suffix: String,

    /// Package clause override for generated files.
    pub package: Option<String>,

    /// Report outputs without writing them.
    pub dry_run: bool,
}

/// Build constraints for generated files.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub tags: Vec<String>,
}

/// The schema runtime the generated code imports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    pub package_path: String,
    pub alias: String,
}

/// Package discovery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Descend into subdirectories.
    pub recursive: bool,

    /// Skip paths ignored by `.gitignore`.
    pub respect_gitignore: bool,

    /// Only consider source files matching this glob, relative to the root.
    pub include: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            package: None,
            dry_run: false,
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            package_path: DEFAULT_SCHEMA_PACKAGE.to_string(),
            alias: DEFAULT_SCHEMA_ALIAS.to_string(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            respect_gitignore: true,
            include: None,
        }
    }
}

impl Config {
    /// Checks values the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.output.suffix.ends_with(".go") || self.output.suffix == ".go" {
            return Err(ConfigError::invalid_value(
                "output.suffix",
                format!("'{}' must end with .go and not be .go alone", self.output.suffix),
            ));
        }
        if let Some(package) = &self.output.package {
            if !is_go_identifier(package) {
                return Err(ConfigError::invalid_value(
                    "output.package",
                    format!("'{package}' is not a Go package name"),
                ));
            }
        }
        if !is_go_identifier(&self.schema.alias) {
            return Err(ConfigError::invalid_value(
                "schema.alias",
                format!("'{}' is not a Go identifier", self.schema.alias),
            ));
        }
        if self.schema.package_path.trim().is_empty() {
            return Err(ConfigError::invalid_value("schema.package_path", "must not be empty"));
        }
        Ok(())
    }

    /// The generator configuration this file describes.
    pub fn generator_config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::new()
            .with_suffix(&self.output.suffix)
            .with_build_tags(&self.build.tags)
            .with_schema_package(&self.schema.package_path)
            .with_schema_alias(&self.schema.alias)
            .with_dry_run(self.output.dry_run);
        if let Some(package) = &self.output.package {
            config = config.with_package(package);
        }
        config
    }
}

fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `gozod.toml` in the working directory is tried. A
    /// missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let explicit = path.is_some();
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !explicit && !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(Self::parse(&config_path, &content)?)
    }

    /// Parses and validates configuration text.
    pub fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Result<Config, ConfigError> {
        if let Some(ref suffix) = args.suffix {
            config.output.suffix = suffix.clone();
        }

        if let Some(ref package) = args.package {
            config.output.package = Some(package.clone());
        }

        if let Some(ref tags) = args.tags {
            config.build.tags = tags.clone();
        }

        if args.dry_run {
            config.output.dry_run = true;
        }

        if args.no_recursive {
            config.scan.recursive = false;
        }

        if let Some(ref include) = args.include {
            config.scan.include = Some(include.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# gozodgen configuration file

[output]
# Appended to each source file's stem: user.go -> user_gen.go
suffix = "_gen.go"

# Package clause of generated files. Defaults to the source package.
# package = "models"

# Print what would be written instead of writing it
dry_run = false

[build]
# Build constraints, joined with && into one //go:build line
tags = []

[schema]
# Import path and name of the schema runtime used by generated code
package_path = "github.com/kaptinlin/gozod"
alias = "schema"

[scan]
# Descend into subdirectories of the given paths
recursive = true

# Skip files ignored by .gitignore
respect_gitignore = true

# Only consider source files matching this glob
# include = "internal/**/*.go"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    pub suffix: Option<String>,
    pub package: Option<String>,
    pub tags: Option<Vec<String>>,
    pub dry_run: bool,
    pub no_recursive: bool,
    pub include: Option<String>,
}
