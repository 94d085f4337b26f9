//! Go output.
//!
//! [`GoEmitter`] writes one `Schema()` method per record. The supporting
//! modules split the work: [`type_mapper`] picks base constructors,
//! [`literal`] renders kernel-checked Go literals and [`format`] reproduces
//! the parts of gofmt's layout the output relies on.

pub mod emitter;
pub mod format;
pub mod literal;
pub mod type_mapper;

pub use emitter::GoEmitter;
