//! Generation runs over discovered packages.
//!
//! [`SchemaGenerator`] ties the scanner to the package resolver. It never
//! writes; callers pass its output to a [`FileWriter`](crate::writer::FileWriter)
//! or compare it against disk with [`SchemaGenerator::check`].

use crate::config::Config;
use crate::error::CliResult;
use crate::scanner::PackageScanner;
use gozod_gen::{is_generated, GeneratedFile, RecordDescriptor, Resolver};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Why a generated file does not match its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The file should exist but does not.
    Missing,
    /// The file exists with different contents.
    Outdated,
    /// A generated file whose source no longer declares records.
    Orphaned,
}

/// A generated file that is out of step with its sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFile {
    pub path: PathBuf,
    pub reason: Staleness,
}

/// Runs generation for a configuration.
pub struct SchemaGenerator {
    config: Config,
    resolver: Resolver,
}

impl SchemaGenerator {
    /// Create a new schema generator with the given configuration.
    pub fn new(config: Config) -> CliResult<Self> {
        let resolver = Resolver::new(config.generator_config())?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Package directories under `roots`, sorted and deduplicated.
    pub fn packages(&self, roots: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
        let mut packages = BTreeSet::new();
        for root in roots {
            let mut scanner = PackageScanner::new(root)
                .with_recursive(self.config.scan.recursive)
                .with_gitignore(self.config.scan.respect_gitignore);
            if let Some(ref pattern) = self.config.scan.include {
                scanner = scanner.with_filter(pattern)?;
            }
            packages.extend(scanner.scan()?);
        }
        Ok(packages.into_iter().collect())
    }

    /// Generates every package under `roots`. The first failing package
    /// aborts the run.
    pub fn generate(&mut self, roots: &[PathBuf]) -> CliResult<Vec<GeneratedFile>> {
        let mut out = Vec::new();
        for package in self.packages(roots)? {
            let files = self.resolver.generate_package(&package)?;
            info!(package = %package.display(), files = files.len(), "generated package");
            out.extend(files);
        }
        Ok(out)
    }

    /// Record descriptors of every package under `roots`.
    pub fn describe(&mut self, roots: &[PathBuf]) -> CliResult<Vec<RecordDescriptor>> {
        let mut out = Vec::new();
        for package in self.packages(roots)? {
            for (_, records) in self.resolver.describe_package(&package)? {
                out.extend(records);
            }
        }
        Ok(out)
    }

    /// Compares what generation would produce with what is on disk.
    pub fn check(&mut self, roots: &[PathBuf]) -> CliResult<Vec<StaleFile>> {
        let files = self.generate(roots)?;
        let mut stale = Vec::new();
        for file in &files {
            let reason = match std::fs::read_to_string(&file.path) {
                Err(_) => Staleness::Missing,
                Ok(existing) if existing != file.contents => Staleness::Outdated,
                Ok(_) => continue,
            };
            debug!(path = %file.path.display(), ?reason, "stale");
            stale.push(StaleFile {
                path: file.path.clone(),
                reason,
            });
        }
        stale.extend(self.orphans(roots, &files)?.into_iter().map(|path| StaleFile {
            path,
            reason: Staleness::Orphaned,
        }));
        Ok(stale)
    }

    /// Generated outputs under `roots` that `files` no longer accounts for.
    pub fn orphans(&self, roots: &[PathBuf], files: &[GeneratedFile]) -> CliResult<Vec<PathBuf>> {
        let expected: BTreeSet<&Path> = files.iter().map(|f| f.path.as_path()).collect();
        let mut out = Vec::new();
        for package in self.packages(roots)? {
            out.extend(
                self.generated_outputs(&package)?
                    .into_iter()
                    .filter(|path| !expected.contains(path.as_path())),
            );
        }
        Ok(out)
    }

    /// Files in a package that carry the output suffix and the generated
    /// header.
    fn generated_outputs(&self, package: &Path) -> CliResult<Vec<PathBuf>> {
        let generator = self.resolver.config();
        let mut out = Vec::new();
        for entry in std::fs::read_dir(package)? {
            let path = entry?.path();
            if !path.is_file() || !generator.is_output_name(&path) {
                continue;
            }
            if std::fs::read_to_string(&path).is_ok_and(|text| is_generated(&text)) {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const USER: &str =
        "package models\n\ntype User struct {\n\tName string `json:\"name\" gozod:\"required,min=2\"`\n}\n";

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/user.go"), USER).unwrap();
        fs::write(dir.path().join("main.go"), "package main\n\nfunc main() {}\n").unwrap();
        dir
    }

    #[test]
    fn test_generate_collects_packages() {
        let dir = workspace();
        let mut generator = SchemaGenerator::new(Config::default()).unwrap();
        let files = generator.generate(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, dir.path().join("models/user_gen.go"));
        assert!(files[0].contents.contains("\"name\": schema.String().Min(2),"));
    }

    #[test]
    fn test_describe_lists_records() {
        let dir = workspace();
        let mut generator = SchemaGenerator::new(Config::default()).unwrap();
        let records = generator.describe(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "User");
        assert_eq!(records[0].fields[0].json_key, "name");
    }

    #[test]
    fn test_check_reports_missing_outdated_and_orphaned() {
        let dir = workspace();
        let roots = [dir.path().to_path_buf()];
        let mut generator = SchemaGenerator::new(Config::default()).unwrap();

        let stale = generator.check(&roots).unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].reason, Staleness::Missing);

        for file in generator.generate(&roots).unwrap() {
            fs::write(&file.path, &file.contents).unwrap();
        }
        assert!(generator.check(&roots).unwrap().is_empty());

        fs::write(dir.path().join("models/user_gen.go"), "// Code generated by gozodgen. DO NOT EDIT.\n\npackage models\n").unwrap();
        let stale = generator.check(&roots).unwrap();
        assert_eq!(stale[0].reason, Staleness::Outdated);

        fs::write(
            dir.path().join("models/old_gen.go"),
            "// Code generated by gozodgen. DO NOT EDIT.\n\npackage models\n",
        )
        .unwrap();
        let stale = generator.check(&roots).unwrap();
        assert!(stale
            .iter()
            .any(|s| s.reason == Staleness::Orphaned && s.path.ends_with("old_gen.go")));
    }

    #[test]
    fn test_orphans_ignore_hand_written_files() {
        let dir = workspace();
        let roots = [dir.path().to_path_buf()];
        let models = dir.path().join("models");
        fs::write(
            models.join("old_gen.go"),
            "// Code generated by gozodgen. DO NOT EDIT.\n\npackage models\n",
        )
        .unwrap();
        fs::write(models.join("manual_gen.go"), "package models\n").unwrap();

        let mut generator = SchemaGenerator::new(Config::default()).unwrap();
        let files = generator.generate(&roots).unwrap();
        let orphans = generator.orphans(&roots, &files).unwrap();
        assert_eq!(orphans, vec![models.join("old_gen.go")]);
    }

    #[test]
    fn test_include_filter() {
        let dir = workspace();
        let mut config = Config::default();
        config.scan.include = Some("other/**/*.go".into());
        let generator = SchemaGenerator::new(config).unwrap();
        assert!(generator
            .packages(&[dir.path().to_path_buf()])
            .unwrap()
            .is_empty());
    }
}
