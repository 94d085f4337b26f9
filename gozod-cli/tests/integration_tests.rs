//! Integration tests for gozod-cli.
//!
//! These tests run the library side of `gozodgen` over a copy of the
//! fixture tree: discovery, generation, writing and freshness checks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use gozod_cli::{
    config::{CliArgs, Config, ConfigManager},
    generator::{SchemaGenerator, Staleness},
    writer::{FileWriter, WriteResult},
    CliError,
};

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// A scratch copy of the fixture tree.
fn fixture_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    copy_dir(&fixtures_path(), dir.path());
    let root = dir.path().join("shop");
    (dir, root)
}

fn write_all(generator: &mut SchemaGenerator, roots: &[PathBuf]) -> Vec<WriteResult> {
    let writer = FileWriter::new(generator.config().output.dry_run);
    generator
        .generate(roots)
        .unwrap()
        .iter()
        .map(|file| writer.write(&file.path, &file.contents).unwrap())
        .collect()
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn test_generate_fixture_tree() {
    let (_dir, root) = fixture_project();
    let mut generator = SchemaGenerator::new(Config::default()).unwrap();
    let files = generator.generate(&[root.clone()]).unwrap();

    let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            root.join("customer_gen.go"),
            root.join("plan_gen.go"),
            root.join("orders/order_gen.go"),
        ]
    );

    let customer = &files[0].contents;
    assert!(customer.contains("\t\"time\"\n"));
    assert!(customer.contains("var _ time.Time\n"));
    assert!(customer.contains("\"id\":        schema.UUID(),"));
    assert!(customer.contains("\"createdAt\": schema.Time(),"));
    assert!(customer.contains("\"nickname\":  schema.String().Min(2).Optional(),"));

    let plan = &files[1].contents;
    assert_eq!(files[1].records, vec!["Plan"]);
    assert!(plan.contains("\"name\": schema.String().Trim().Min(1),"));
    assert!(plan.contains("\"tier\": schema.Enum(1, 2, 3).Default(1),"));

    let order = &files[2].contents;
    assert_eq!(files[2].records, vec!["Order", "Line"]);
    assert!(order.contains("package orders\n"));
    assert!(order.contains("\tregex \"regexp\"\n"));
    assert!(order.contains("\"lines\": schema.Slice(schema.FromStruct[Line]()).Min(1),"));
    assert!(order.contains("\"sku\": schema.String().Regex(regex.MustCompile(\"^[A-Z0-9]+$\")),"));
}

#[test]
fn test_generate_then_check_round_trip() {
    let (_dir, root) = fixture_project();
    let roots = [root.clone()];
    let mut generator = SchemaGenerator::new(Config::default()).unwrap();

    let stale = generator.check(&roots).unwrap();
    assert_eq!(stale.len(), 3);
    assert!(stale.iter().all(|s| s.reason == Staleness::Missing));

    let results = write_all(&mut generator, &roots);
    assert!(results.iter().all(WriteResult::was_written));
    assert!(generator.check(&roots).unwrap().is_empty());

    // A second run finds nothing to do.
    let results = write_all(&mut generator, &roots);
    assert!(results
        .iter()
        .all(|r| matches!(r, WriteResult::Unchanged { .. })));

    // Editing a source makes its output stale.
    let plan = root.join("plan.go");
    let text = fs::read_to_string(&plan).unwrap().replace("min=1", "min=3");
    fs::write(&plan, text).unwrap();
    let stale = generator.check(&roots).unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].path, root.join("plan_gen.go"));
    assert_eq!(stale[0].reason, Staleness::Outdated);
}

#[test]
fn test_untagged_source_orphans_its_output() {
    let (_dir, root) = fixture_project();
    let roots = [root.clone()];
    let mut generator = SchemaGenerator::new(Config::default()).unwrap();
    write_all(&mut generator, &roots);

    fs::write(
        root.join("plan.go"),
        "package shop\n\ntype Plan struct {\n\tName string\n}\n",
    )
    .unwrap();
    let files = generator.generate(&roots).unwrap();
    assert_eq!(files.len(), 2);

    let orphans = generator.orphans(&roots, &files).unwrap();
    assert_eq!(orphans, vec![root.join("plan_gen.go")]);
    let stale = generator.check(&roots).unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].reason, Staleness::Orphaned);

    let result = FileWriter::new(false).remove(&orphans[0]).unwrap();
    assert!(result.was_written());
    assert!(generator.check(&roots).unwrap().is_empty());
}

#[test]
fn test_dry_run_writes_nothing() {
    let (_dir, root) = fixture_project();
    let config = ConfigManager::merge_cli_args(
        Config::default(),
        &CliArgs {
            dry_run: true,
            ..Default::default()
        },
    )
    .unwrap();
    let mut generator = SchemaGenerator::new(config).unwrap();
    let results = write_all(&mut generator, &[root.clone()]);

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.was_written()));
    assert!(!root.join("customer_gen.go").exists());
}

#[test]
fn test_no_recursive_stays_in_root() {
    let (_dir, root) = fixture_project();
    let config = ConfigManager::merge_cli_args(
        Config::default(),
        &CliArgs {
            no_recursive: true,
            ..Default::default()
        },
    )
    .unwrap();
    let mut generator = SchemaGenerator::new(config).unwrap();
    let files = generator.generate(&[root.clone()]).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.path.parent() == Some(root.as_path())));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_file_drives_output() {
    let (dir, root) = fixture_project();
    let config_path = dir.path().join("gozod.toml");
    fs::write(
        &config_path,
        "[output]\nsuffix = \".schema.go\"\npackage = \"dto\"\n\n[build]\ntags = [\"gen\"]\n",
    )
    .unwrap();

    let config = ConfigManager::load(Some(&config_path)).unwrap();
    let mut generator = SchemaGenerator::new(config).unwrap();
    let files = generator.generate(&[root.join("orders")]).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, root.join("orders/order.schema.go"));
    assert!(files[0]
        .contents
        .contains("//go:build gen\n\npackage dto\n"));
}

#[test]
fn test_flags_override_config_file() {
    let (dir, _root) = fixture_project();
    let config_path = dir.path().join("gozod.toml");
    fs::write(&config_path, "[output]\nsuffix = \".schema.go\"\n").unwrap();

    let config = ConfigManager::load(Some(&config_path)).unwrap();
    let merged = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            suffix: Some("_zod.go".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(merged.output.suffix, "_zod.go");
}

// =============================================================================
// Failures and IR
// =============================================================================

#[test]
fn test_generation_error_aborts_run() {
    let (_dir, root) = fixture_project();
    fs::write(
        root.join("broken.go"),
        "package shop\n\ntype Broken struct {\n\tName string `gozod:\"required,nonsense\"`\n}\n",
    )
    .unwrap();

    let mut generator = SchemaGenerator::new(Config::default()).unwrap();
    let err = generator.generate(&[root]).unwrap_err();
    assert!(matches!(err, CliError::Generate(_)));
    assert!(err.to_string().contains("Broken.Name: unknown rule 'nonsense'"));
}

#[test]
fn test_describe_serializes_records() {
    let (_dir, root) = fixture_project();
    let mut generator = SchemaGenerator::new(Config::default()).unwrap();
    let records = generator.describe(&[root]).unwrap();

    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Customer", "Plan", "Order", "Line"]);

    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[0]["fields"][0]["json_key"], "id");
    assert_eq!(
        json[0]["fields"][0]["semantic_type"],
        serde_json::json!({"type": "primitive", "value": "string"})
    );
    assert_eq!(json[1]["fields"][1]["semantic_type"]["value"], "int8");
}

#[test]
fn test_missing_root() {
    let mut generator = SchemaGenerator::new(Config::default()).unwrap();
    let err = generator
        .generate(&[PathBuf::from("/no/such/project")])
        .unwrap_err();
    assert!(matches!(err, CliError::Scan(_)));
}
