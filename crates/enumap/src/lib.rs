//! # enumap — Ordered, Named-Field Records
//!
//! An enumap schema declares an ordered set of field names. Construction
//! calls take positional and keyword values, check them against the
//! declared names, and produce either an ordered map or a fixed-shape
//! record in declared order.
//!
//! ```
//! use enumap::{Args, Caster, Enumap, FieldSchema};
//!
//! let mut pastry = FieldSchema::new("Pastry", "croissant donut muffin").unwrap();
//! pastry
//!     .set_types(Args::positional([Caster::int(), Caster::int(), Caster::int()])
//!         .keyword("donut", Caster::float()))
//!     .unwrap();
//! let record = pastry.record_casted(Args::positional(["1", "2.5", "3"])).unwrap();
//! assert_eq!(record.to_string(), "Pastry_record(croissant=1, donut=2.5, muffin=3)");
//! ```
//!
//! ## Schema kinds
//!
//! - [`FieldSchema`] is strict: every field must be supplied on every call.
//! - [`SparseFieldSchema`] fills unsupplied fields from registered defaults,
//!   or `null`.
//!
//! Both implement [`Enumap`]: `map`, `map_casted`, `record`,
//! `record_casted`, plus name introspection.
//!
//! ## Pipeline
//!
//! 1. **Resolve** ([`resolve`]) binds positional values in order, lets
//!    keyword values override them, and applies the strict or sparse fill
//!    policy.
//! 2. **Cast** ([`cast`]) applies registered casters to supplied values
//!    only, reporting the first failure in declared order.
//! 3. **Materialize** ([`record`]) shapes the result as a [`FieldMap`] or a
//!    [`Record`].
//!
//! ## Crate Policy
//!
//! - Depends only on `enumap-core` internally.
//! - No I/O and no shared mutable state: configuration takes `&mut self`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod args;
pub mod cast;
pub mod caster;
pub mod definition;
pub mod record;
pub mod registry;
pub mod resolve;
pub mod schema;

pub use args::{Args, TypeArgs};
pub use caster::{Caster, BUILTIN_CASTERS};
pub use definition::{DefinedSchema, FieldDefinition, SchemaDefinition};
pub use record::{FieldMap, Record, RecordShape};
pub use registry::{DefaultRegistry, TypeRegistry};
pub use resolve::{FieldSource, Resolved};
pub use schema::{Enumap, FieldSchema, FieldSpec, SchemaBuilder, SparseFieldSchema};

pub use enumap_core::{
    CastError, CastFailure, EnumapError, FieldName, SchemaError, ValueKind,
};

pub use serde_json::Value;

/// Result of a construction call.
pub type Result<T> = std::result::Result<T, EnumapError>;
