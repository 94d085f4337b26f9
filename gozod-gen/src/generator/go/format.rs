//! Canonical Go layout.
//!
//! The emitter writes gofmt-stable text directly instead of shelling out to
//! a formatter. This module holds the pieces of gofmt's layout the output
//! depends on: key/value column alignment, import grouping and receiver
//! naming.

/// Keys up to this many bytes never break an alignment section.
const SMALL_KEY: usize = 40;

/// Key size ratio, relative to the running geometric mean, that breaks a
/// section.
const BREAK_RATIO: f64 = 2.5;

/// Lays out composite literal entries the way gofmt does.
///
/// Each entry is a `(key, value)` pair of already-rendered expressions.
/// Returns one line per entry, without indentation, each ending in `,`.
pub fn align_entries(entries: &[(String, String)]) -> Vec<String> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut lnsum = 0.0;
    let mut count = 0usize;
    let mut prev_size = 0usize;

    for (i, (key, _)) in entries.iter().enumerate() {
        let size = key.len();
        if i > 0 && count > 0 && !(prev_size <= SMALL_KEY && size <= SMALL_KEY) {
            let geomean = (lnsum / count as f64).exp();
            let ratio = size as f64 / geomean;
            if BREAK_RATIO * ratio <= 1.0 || BREAK_RATIO <= ratio {
                sections.push(start..i);
                start = i;
            }
        }
        if size > 0 {
            lnsum += (size as f64).ln();
            count += 1;
        }
        prev_size = size;
    }
    if start < entries.len() {
        sections.push(start..entries.len());
    }

    let mut lines = Vec::with_capacity(entries.len());
    for section in sections {
        let entries = &entries[section];
        let width = entries
            .iter()
            .map(|(key, _)| key.chars().count() + 1)
            .max()
            .unwrap_or(0);
        for (key, value) in entries {
            let pad = width - (key.chars().count() + 1) + 1;
            lines.push(format!("{key}:{}{value},", " ".repeat(pad)));
        }
    }
    lines
}

/// One import spec.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Import {
    pub path: String,
    pub alias: Option<String>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    /// An aliased import. The alias is dropped when it equals the package
    /// name implied by the path.
    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        let path = path.into();
        let alias = alias.into();
        let implied = path.rsplit('/').next().unwrap_or(&path);
        let alias = (alias != implied).then_some(alias);
        Self { path, alias }
    }

    /// The name the importing file refers to the package by.
    pub fn name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }

    fn is_standard(&self) -> bool {
        let first = self.path.split('/').next().unwrap_or_default();
        !first.contains('.')
    }

    fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias} \"{}\"", self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

/// Renders an import block: standard library first, then everything else,
/// each group sorted by path.
pub fn import_block(imports: &[Import]) -> String {
    let (mut std, mut other): (Vec<_>, Vec<_>) = imports.iter().partition(|i| i.is_standard());
    std.sort();
    std.dedup();
    other.sort();
    other.dedup();

    let mut out = String::from("import (\n");
    for import in &std {
        out.push_str(&format!("\t{}\n", import.render()));
    }
    if !std.is_empty() && !other.is_empty() {
        out.push('\n');
    }
    for import in &other {
        out.push_str(&format!("\t{}\n", import.render()));
    }
    out.push_str(")\n");
    out
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Whether `text` is an identifier, optionally package-qualified.
pub fn is_identifier(text: &str) -> bool {
    let parts: Vec<&str> = text.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
                && !is_keyword(part)
        })
}

/// Derives a short receiver name from a type name.
///
/// The first letter and the first letter of each later CamelCase word are
/// lower-cased and joined: `UserProfile` gives `up`. A name that opens with
/// an acronym uses only its first letter. Type parameters are ignored, and
/// a keyword or empty result falls back to `x`.
pub fn receiver_name(type_name: &str) -> String {
    let name = type_name.split('[').next().unwrap_or(type_name).trim();
    let chars: Vec<char> = name.chars().collect();
    let Some(&first) = chars.first().filter(|c| c.is_alphabetic()) else {
        return "x".to_string();
    };

    let mut out: String = first.to_lowercase().collect();
    if !chars.get(1).is_some_and(|c| c.is_uppercase()) {
        for pair in chars.windows(2) {
            if pair[1].is_uppercase() && (pair[0].is_lowercase() || pair[0].is_ascii_digit()) {
                out.extend(pair[1].to_lowercase());
            }
        }
    }

    if out.is_empty() || is_keyword(&out) {
        "x".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (format!("\"{k}\""), v.to_string()))
            .collect()
    }

    #[test]
    fn test_align_short_keys() {
        let lines = align_entries(&entries(&[
            ("id", "schema.UUID()"),
            ("name", "schema.String()"),
            ("email", "schema.String().Email()"),
        ]));
        assert_eq!(
            lines,
            vec![
                "\"id\":    schema.UUID(),",
                "\"name\":  schema.String(),",
                "\"email\": schema.String().Email(),",
            ]
        );
    }

    #[test]
    fn test_long_key_breaks_section() {
        let long = "a".repeat(60);
        let lines = align_entries(&entries(&[
            ("id", "schema.Int()"),
            ("ok", "schema.Bool()"),
            (&long, "schema.String()"),
            ("x", "schema.Any()"),
        ]));
        assert_eq!(lines[0], "\"id\": schema.Int(),");
        assert_eq!(lines[1], "\"ok\": schema.Bool(),");
        assert_eq!(lines[2], format!("\"{long}\": schema.String(),"));
        assert_eq!(lines[3], "\"x\": schema.Any(),");
    }

    #[test]
    fn test_import_block_groups() {
        let block = import_block(&[
            Import::aliased("github.com/kaptinlin/gozod", "schema"),
            Import::new("time"),
            Import::aliased("regexp", "regex"),
        ]);
        assert_eq!(
            block,
            "import (\n\tregex \"regexp\"\n\t\"time\"\n\n\tschema \"github.com/kaptinlin/gozod\"\n)\n"
        );
    }

    #[test]
    fn test_import_alias_elided_when_implied() {
        let import = Import::aliased("github.com/kaptinlin/gozod", "gozod");
        assert_eq!(import.alias, None);
        assert_eq!(import.name(), "gozod");
    }

    #[test]
    fn test_receiver_names() {
        assert_eq!(receiver_name("User"), "u");
        assert_eq!(receiver_name("UserProfile"), "up");
        assert_eq!(receiver_name("APIResponse"), "a");
        assert_eq!(receiver_name("Page[T any]"), "p");
        assert_eq!(receiver_name("Order2Item"), "oi");
        assert_eq!(receiver_name("_hidden"), "x");
        assert_eq!(receiver_name(""), "x");
        // Spells a keyword.
        assert_eq!(receiver_name("FunkyOddlyRepeated"), "x");
        assert_eq!(receiver_name("TypeYes"), "ty");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("validateAge"));
        assert!(is_identifier("rules.NotBlank"));
        assert!(!is_identifier("a.b.c"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("func"));
        assert!(!is_identifier(""));
    }
}
