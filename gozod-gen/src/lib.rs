//! # gozod-gen
//!
//! Reflection-free schema generation for Go structs annotated with `gozod`
//! tags.
//!
//! Given a package directory, the generator parses its Go sources with
//! tree-sitter, lowers every annotated struct into a [`RecordDescriptor`]
//! and writes a `Schema()` method per record that builds the equivalent
//! gozod schema with chained calls:
//!
//! ```go
//! //go:generate gozodgen
//! type User struct {
//!     ID   string `json:"id" gozod:"required,uuid"`
//!     Name string `json:"name" gozod:"required,min=2,max=50"`
//! }
//! ```
//!
//! becomes
//!
//! ```go
//! func (u User) Schema() *schema.ZodStruct[User, User] {
//!     return schema.Struct[User](schema.StructSchema{
//!         "id":   schema.UUID(),
//!         "name": schema.String().Min(2).Max(50),
//!     })
//! }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Parse sources, build the package type index | [`parser`] |
//! | Field and record model | [`ir`] |
//! | Render Go | [`generator`] |
//! | Drive a package end to end | [`resolver`] |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gozod_gen::{GeneratorConfig, Resolver};
//! use std::path::Path;
//!
//! let mut resolver = Resolver::new(GeneratorConfig::default())?;
//! for file in resolver.generate_package(Path::new("./models"))? {
//!     std::fs::write(&file.path, &file.contents)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod generator;
pub mod ir;
pub mod parser;
pub mod resolver;

pub use error::{EmissionError, GenerateError, Result};
pub use generator::{CodeGenerator, GeneratedCode, GeneratorConfig, GoEmitter, GENERATED_MARKER};
pub use ir::{FieldDescriptor, PrimitiveKind, RecordDescriptor, SemanticType};
pub use resolver::{is_generated, GeneratedFile, Resolver};
