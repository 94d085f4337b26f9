//! Intermediate representation.
//!
//! Parsed Go declarations are lowered into these serializable descriptors,
//! which the emitter consumes and `--dump-ir` prints.

pub mod schema;
pub mod types;

pub use schema::{FieldDescriptor, RecordDescriptor};
pub use types::{PrimitiveKind, SemanticType};
