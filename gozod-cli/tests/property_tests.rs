//! Property-based tests for gozod-cli.
//!
//! Properties tested:
//! - Package discovery completeness
//! - Include filter correctness
//! - Config override precedence
//! - Config file completeness
//! - Dry run safety
//! - Generation determinism and freshness after writing

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use gozod_cli::{
    config::{CliArgs, Config, ConfigManager},
    generator::SchemaGenerator,
    scanner::PackageScanner,
    writer::FileWriter,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Field types paired with a tag that is valid for them.
const FIELD_KINDS: &[(&str, &str)] = &[
    ("string", "required,min=1"),
    ("string", "email"),
    ("*string", "max=20"),
    ("int", "positive"),
    ("int64", "min=0,max=99"),
    ("float64", "gte=0.5"),
    ("bool", "required"),
    ("[]string", "max=3"),
    ("map[string]int", "min=1"),
];

/// An exported Go identifier.
fn arb_exported() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,8}"
}

/// A Go struct with tagged fields of assorted kinds.
fn arb_struct() -> impl Strategy<Value = String> {
    (
        arb_exported(),
        prop::collection::btree_set(arb_exported(), 1..6),
        prop::collection::vec(0..FIELD_KINDS.len(), 6),
    )
        .prop_map(|(name, fields, kinds)| {
            let mut out = format!("type {name}Record struct {{\n");
            for (i, (field, kind)) in fields.iter().zip(kinds).enumerate() {
                let (ty, tag) = FIELD_KINDS[kind];
                out.push_str(&format!(
                    "\t{field} {ty} `json:\"f{i}\" gozod:\"{tag}\"`\n"
                ));
            }
            out.push_str("}\n");
            out
        })
}

fn go_file(package: &str, body: &str) -> String {
    format!("package {package}\n\n{body}")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// =============================================================================
// Property 1: Package Discovery Completeness
//
// Every directory holding a non-test .go file is reported exactly once, and
// directories holding only tests or other files are not.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_package_discovery_completeness(
        packages in prop::collection::btree_set("[a-z]{1,4}(/[a-z]{1,4}){0,2}", 1..6),
        test_only in prop::collection::btree_set("t[0-9]{1,3}", 0..3),
    ) {
        let dir = TempDir::new().unwrap();
        for package in &packages {
            write_file(&dir.path().join(package).join("a.go"), "package a\n");
        }
        for name in &test_only {
            write_file(&dir.path().join(name).join("a_test.go"), "package a\n");
            write_file(&dir.path().join(name).join("README.md"), "# t\n");
        }

        let found = PackageScanner::new(dir.path()).scan().unwrap();
        let expected: Vec<PathBuf> = packages
            .iter()
            .map(|p| dir.path().join(p))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        prop_assert_eq!(found, expected);
    }
}

// =============================================================================
// Property 2: Include Filter Correctness
//
// With an include glob, only packages with a matching file are reported.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_include_filter_correctness(
        kept in prop::collection::btree_set("[a-m]{2,5}", 1..4),
        dropped in prop::collection::btree_set("[n-z]{2,5}", 1..4),
    ) {
        let dir = TempDir::new().unwrap();
        for name in kept.iter().chain(&dropped) {
            write_file(&dir.path().join(name).join("model.go"), "package m\n");
            write_file(&dir.path().join(name).join("other.go"), "package m\n");
        }
        for name in &dropped {
            fs::remove_file(dir.path().join(name).join("model.go")).unwrap();
        }

        let found = PackageScanner::new(dir.path())
            .with_filter("*/model.go")
            .unwrap()
            .scan()
            .unwrap();
        let expected: Vec<PathBuf> = kept.iter().map(|k| dir.path().join(k)).collect();

        prop_assert_eq!(found, expected);
    }
}

// =============================================================================
// Property 3: Config Override Precedence
//
// A value given on the command line always replaces the file's value, and
// an absent flag leaves the file's value alone.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_config_override_precedence(
        file_suffix in "_[a-z]{1,6}\\.go",
        cli_suffix in prop::option::of("_[a-z]{1,6}\\.go"),
        file_package in "[a-z]{1,8}",
        cli_package in prop::option::of("[a-z]{1,8}"),
        cli_tags in prop::option::of(prop::collection::vec("[a-z]{1,6}", 0..3)),
        cli_dry_run in any::<bool>(),
    ) {
        let mut config = Config::default();
        config.output.suffix = file_suffix.clone();
        config.output.package = Some(file_package.clone());
        config.build.tags = vec!["file".to_string()];

        let args = CliArgs {
            suffix: cli_suffix.clone(),
            package: cli_package.clone(),
            tags: cli_tags.clone(),
            dry_run: cli_dry_run,
            ..Default::default()
        };
        let merged = ConfigManager::merge_cli_args(config, &args).unwrap();

        prop_assert_eq!(merged.output.suffix, cli_suffix.unwrap_or(file_suffix));
        prop_assert_eq!(merged.output.package, Some(cli_package.unwrap_or(file_package)));
        prop_assert_eq!(merged.build.tags, cli_tags.unwrap_or_else(|| vec!["file".to_string()]));
        prop_assert_eq!(merged.output.dry_run, cli_dry_run);
    }
}

// =============================================================================
// Property 4: Config File Completeness
//
// Every setting written to gozod.toml is loaded.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_config_file_completeness(
        suffix in "[._][a-z]{1,6}\\.go",
        package in "[a-z]{1,8}",
        tags in prop::collection::vec("[a-z]{1,6}", 0..4),
        alias in "[a-z]{1,6}",
        recursive in any::<bool>(),
    ) {
        let tag_list = tags
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let content = format!(
            "[output]\nsuffix = \"{suffix}\"\npackage = \"{package}\"\n\n\
             [build]\ntags = [{tag_list}]\n\n\
             [schema]\nalias = \"{alias}\"\n\n\
             [scan]\nrecursive = {recursive}\n"
        );

        let config = ConfigManager::parse(Path::new("gozod.toml"), &content).unwrap();
        prop_assert_eq!(&config.output.suffix, &suffix);
        prop_assert_eq!(config.output.package.as_deref(), Some(package.as_str()));
        prop_assert_eq!(&config.build.tags, &tags);
        prop_assert_eq!(&config.schema.alias, &alias);
        prop_assert_eq!(config.scan.recursive, recursive);

        let generator = config.generator_config();
        prop_assert_eq!(generator.build_constraint().is_some(), !tags.is_empty());
    }
}

// =============================================================================
// Property 5: Dry Run Safety
//
// A dry run reports every output and creates nothing on disk.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_dry_run_safety(bodies in prop::collection::vec(arb_struct(), 1..4)) {
        let dir = TempDir::new().unwrap();
        for (i, body) in bodies.iter().enumerate() {
            write_file(&dir.path().join(format!("m{i}.go")), &go_file("models", body));
        }
        let before: BTreeSet<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();

        let config = ConfigManager::merge_cli_args(
            Config::default(),
            &CliArgs { dry_run: true, ..Default::default() },
        )
        .unwrap();
        let mut generator = SchemaGenerator::new(config).unwrap();
        let files = generator.generate(&[dir.path().to_path_buf()]).unwrap();
        prop_assert_eq!(files.len(), bodies.len());

        let writer = FileWriter::new(true);
        for file in &files {
            let result = writer.write(&file.path, &file.contents).unwrap();
            prop_assert!(!result.was_written());
            prop_assert!(!file.path.exists());
        }

        let after: BTreeSet<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        prop_assert_eq!(before, after);
    }
}

// =============================================================================
// Property 6: Generation Determinism
//
// Generating twice yields identical output, and once written the outputs
// are reported fresh.
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_generation_is_deterministic_and_fresh(body in arb_struct()) {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("model.go"), &go_file("models", &body));
        let roots = [dir.path().to_path_buf()];

        let mut generator = SchemaGenerator::new(Config::default()).unwrap();
        let first = generator.generate(&roots).unwrap();
        let second = generator.generate(&roots).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 1);
        prop_assert!(first[0].contents.starts_with("// Code generated by gozodgen. DO NOT EDIT."));

        let writer = FileWriter::new(false);
        for file in &first {
            writer.write(&file.path, &file.contents).unwrap();
        }
        prop_assert!(generator.check(&roots).unwrap().is_empty());

        // The written output is skipped as input on the next run.
        let third = generator.generate(&roots).unwrap();
        prop_assert_eq!(first, third);
    }
}
