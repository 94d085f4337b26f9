//! Pure validator predicates.
//!
//! Every predicate takes a [`Value`](crate::Value) (plus parameters) and
//! returns `bool`. Type mismatches return `false`; nothing here panics or
//! surfaces a coercion error.
//!
//! ```rust
//! use gozod::validate::{format, numeric};
//! use gozod::Value;
//!
//! assert!(format::email(&Value::from("ada@example.com")));
//! assert!(!format::email(&Value::Int(42)));
//! assert!(numeric::gte(&Value::Int(18), &Value::Int(18)));
//! ```

pub mod format;
pub mod iso;
pub mod length;
pub mod numeric;
pub mod string;
pub mod structural;

pub use format::MacOptions;
pub use iso::{IsoDateTimeOptions, IsoTimeOptions};
pub use structural::{JwtOptions, UrlOptions};
