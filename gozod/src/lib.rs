//! # gozod
//!
//! The rule pipeline behind `gozod` struct tags: a compact validation DSL
//! embedded in Go struct fields (`gozod:"required,min=2,max=50"`).
//!
//! This crate holds everything both the runtime and the code generator
//! share:
//!
//! | Module | Role |
//! |--------|------|
//! | [`patterns`] | Named, anchored regex catalog plus cached pattern factories |
//! | [`coerce`] | Type-parameterized conversion of dynamic values with typed errors |
//! | [`tag`] | Tag lexer and parser producing ordered [`Rule`] lists |
//! | [`rule`] | The rule model and the shared vocabulary table |
//! | [`validate`] | Pure predicates: numeric, length, string, format, ISO, structural |
//! | [`check`] | Runtime evaluation of a rule list against a [`Value`] |
//!
//! ## Quick Start
//!
//! ```rust
//! use gozod::{parse_tag, RuleSet, Value};
//!
//! let rules = parse_tag("required,min=2,max=50,regex='^[A-Z]+$'").unwrap();
//! assert_eq!(rules.len(), 4);
//! assert_eq!(rules[3].params, vec!["^[A-Z]+$"]);
//!
//! let set = RuleSet::from_rules(rules);
//! assert!(set.check(&Value::from("GOZOD")).is_ok());
//! assert!(!set.check(&Value::from("gozod")).is_ok());
//! ```
//!
//! ## Tag Grammar
//!
//! ```text
//! Tag          := Rule { "," Rule }
//! Rule         := Name [ "=" Params ]
//! Params       := QuotedString | JsonLiteral | WordList | SingleValue
//! JsonLiteral  := "[" ... "]" | "{" ... "}"
//! QuotedString := "'" <escaped> "'"
//! WordList     := Word { WS Word }
//! ```
//!
//! Quoted parameters decode `\,` `\n` `\t` `\'` `\"` and `\\`. A `\,` outside
//! quotes is a literal comma. Commas inside brackets or braces never split
//! rules, so JSON defaults can be written inline:
//! `default=["a","b"]`.
//!
//! ## Thread Safety
//!
//! Catalog patterns are initialized once and shared. Factory patterns are
//! cached behind a mutex that is held only for lookup and insert. Everything
//! else is stateless, so validators can be called from any number of threads.

pub mod check;
pub mod coerce;
pub mod patterns;
pub mod rule;
pub mod tag;
pub mod validate;
pub mod value;

pub use check::{CheckReport, Issue, IssueCode, RuleSet};
pub use coerce::CoercionError;
pub use rule::{rules_to_tag, Rule, RuleKind, RuleSpec, RULES};
pub use tag::{parse_tag, TagError};
pub use value::{Complex128, Complex64, Value};
