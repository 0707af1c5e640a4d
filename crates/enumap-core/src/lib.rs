//! # enumap-core — Foundational Types for Enumap
//!
//! This crate is the leaf of the enumap workspace. It defines the primitives
//! every schema operation agrees on, and nothing else: the `enumap` crate
//! builds the resolution engine on top of these types.
//!
//! ## Key Design Principles
//!
//! 1. **Validated field names.** `FieldName` can only be built through
//!    [`FieldName::new`], so every name stored in a schema is a non-empty
//!    identifier. No bare strings for declared fields.
//!
//! 2. **Structured errors.** Every failure carries its data as fields
//!    (`missing`, `invalid`, `expected`, `got`, the uncast value and its
//!    kind). Messages are derived from those fields; callers never parse
//!    error strings.
//!
//! 3. **One value model.** Field values are `serde_json::Value`. The
//!    absence-marker for sparse schemas is `Value::Null`, and
//!    [`ValueKind`] names the runtime kind of any value for cast reports.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `enumap` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod name;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{CastError, CastFailure, EnumapError, SchemaError};
pub use name::FieldName;
pub use value::ValueKind;
