//! Property-based tests for the generator.
//!
//! Properties tested:
//! - Entries follow field declaration order, one per tagged field
//! - Entry values share one column within a struct literal
//! - Pointer fields are optional unless required
//! - Output is deterministic and is never picked up as input

use std::path::Path;

use gozod_gen::{is_generated, GeneratorConfig, Resolver};
use proptest::prelude::*;

// =============================================================================
// Generators for property tests
// =============================================================================

/// Field types paired with a tag that is valid for them.
const FIELD_KINDS: &[(&str, &str)] = &[
    ("string", "required,min=1"),
    ("string", "email,max=64"),
    ("*string", "max=20"),
    ("*string", "required,url"),
    ("*int", "gte=0"),
    ("int", "positive"),
    ("uint8", "max=200"),
    ("float64", "gte=0.5,lt=100"),
    ("bool", "required"),
    ("[]string", "max=3"),
    ("map[string]int", "min=1"),
];

#[derive(Debug, Clone)]
struct Field {
    name: String,
    key: String,
    ty: &'static str,
    tag: &'static str,
}

fn arb_fields() -> impl Strategy<Value = Vec<Field>> {
    (
        prop::collection::btree_set("[A-Z][a-z]{2,8}", 1..8),
        prop::collection::vec((0..FIELD_KINDS.len(), "[a-z]{1,12}"), 8),
    )
        .prop_map(|(names, picks)| {
            names
                .into_iter()
                .zip(picks)
                .enumerate()
                .map(|(i, (name, (kind, key)))| {
                    let (ty, tag) = FIELD_KINDS[kind];
                    Field {
                        name,
                        // The index keeps keys unique.
                        key: format!("{key}{i}"),
                        ty,
                        tag,
                    }
                })
                .collect()
        })
}

fn source(fields: &[Field]) -> String {
    let mut out = String::from("package models\n\ntype Record struct {\n");
    for f in fields {
        out.push_str(&format!(
            "\t{} {} `json:\"{}\" gozod:\"{}\"`\n",
            f.name, f.ty, f.key, f.tag
        ));
    }
    out.push_str("}\n");
    out
}

fn generate(text: &str) -> Option<String> {
    let mut resolver = Resolver::new(GeneratorConfig::default()).unwrap();
    resolver
        .generate_source(Path::new("models/record.go"), text)
        .unwrap()
        .map(|file| file.contents)
}

/// The `"key": value` lines of the generated struct literal.
fn entries(output: &str) -> Vec<&str> {
    output
        .lines()
        .filter(|line| line.starts_with("\t\t\""))
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_entries_follow_declaration_order(fields in arb_fields()) {
        let output = generate(&source(&fields)).unwrap();
        let keys: Vec<String> = entries(&output)
            .iter()
            .map(|line| line.trim_start().split('"').nth(1).unwrap_or_default().to_string())
            .collect();
        let expected: Vec<String> = fields.iter().map(|f| f.key.clone()).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_values_share_one_column(fields in arb_fields()) {
        let output = generate(&source(&fields)).unwrap();
        let columns: Vec<usize> = entries(&output)
            .iter()
            .map(|line| line.find("schema.").unwrap_or(0))
            .collect();
        prop_assert!(columns.iter().all(|&c| c > 0 && c == columns[0]));

        let longest = fields.iter().map(|f| f.key.len()).max().unwrap_or(0);
        // Two tabs, the quoted key, the colon and one space.
        prop_assert_eq!(columns[0], 2 + longest + 3 + 1);
    }

    #[test]
    fn prop_pointers_are_optional_unless_required(fields in arb_fields()) {
        let output = generate(&source(&fields)).unwrap();
        for (line, field) in entries(&output).iter().zip(&fields) {
            let optional = field.ty.starts_with('*') && !field.tag.contains("required");
            prop_assert_eq!(line.ends_with(".Optional(),"), optional, "{}", line);
        }
    }

    #[test]
    fn prop_output_is_stable_and_inert(fields in arb_fields()) {
        let text = source(&fields);
        let first = generate(&text).unwrap();
        let second = generate(&text).unwrap();
        prop_assert_eq!(&first, &second);

        prop_assert!(is_generated(&first));
        prop_assert_eq!(generate(&first), None);
    }
}
