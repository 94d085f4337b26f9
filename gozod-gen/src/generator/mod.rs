//! Code generator module.
//!
//! This module defines the code generator trait and the Go implementation.

pub mod go;
pub mod traits;

pub use go::GoEmitter;
pub use traits::{
    CodeGenerator, GeneratedCode, GeneratorConfig, DEFAULT_SCHEMA_ALIAS, DEFAULT_SCHEMA_PACKAGE,
    DEFAULT_SUFFIX, GENERATED_MARKER,
};
