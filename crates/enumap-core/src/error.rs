//! # Error Types — Structured Error Taxonomy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Structured fields are the source of truth; messages
//! are rendered from them.
//!
//! ## Design
//!
//! - `SchemaError` is raised while declaring or configuring a schema.
//! - `EnumapError` is raised by construction calls (`map`, `record` and
//!   their casted forms). It separates too many positional values, a
//!   mismatched key set, and a failed cast so callers can branch on each.
//! - `CastError` always names the first failing field in declared order and
//!   keeps the underlying failure reachable through `source()`.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::value::ValueKind;

/// Error raised by a construction call.
#[derive(Error, Debug)]
pub enum EnumapError {
    /// More positional values than declared fields.
    #[error("{schema} takes {expected} positional values but {got} were given")]
    TooManyArguments {
        /// Title of the schema that rejected the call.
        schema: String,
        /// Number of declared fields.
        expected: usize,
        /// Number of positional values supplied.
        got: usize,
    },

    /// The resolved key set differs from the declared names.
    ///
    /// Strict schemas report both sets; sparse schemas only ever report
    /// `invalid`, leaving `missing` empty.
    #[error(
        "{schema} requires fields ({}); missing fields {}, invalid fields {}",
        .expected.join(", "),
        render_set(.missing),
        render_set(.invalid)
    )]
    SchemaMismatch {
        /// Title of the schema that rejected the call.
        schema: String,
        /// Declared field names, in order.
        expected: Vec<String>,
        /// Declared names that received no value.
        missing: BTreeSet<String>,
        /// Supplied keys that are not declared names.
        invalid: BTreeSet<String>,
    },

    /// A per-field caster failed.
    #[error(transparent)]
    Cast(#[from] CastError),

    /// The schema itself is misconfigured.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl EnumapError {
    /// Declared names that received no value, if this is a mismatch.
    pub fn missing(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::SchemaMismatch { missing, .. } => Some(missing),
            _ => None,
        }
    }

    /// Supplied keys outside the schema, if this is a mismatch.
    pub fn invalid(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::SchemaMismatch { invalid, .. } => Some(invalid),
            _ => None,
        }
    }

    /// The cast failure, if a caster rejected a value.
    pub fn as_cast(&self) -> Option<&CastError> {
        match self {
            Self::Cast(err) => Some(err),
            _ => None,
        }
    }
}

/// A caster rejected the value supplied for a field.
#[derive(Error, Debug)]
#[error("cannot cast field '{field}' from {value_kind} value {value}: {source}")]
pub struct CastError {
    /// The field whose caster failed.
    pub field: String,
    /// The raw value handed to the caster.
    pub value: Value,
    /// Runtime kind of `value`.
    pub value_kind: ValueKind,
    /// The caster's own failure.
    pub source: CastFailure,
}

impl CastError {
    /// Wrap a caster failure with the field and value it was applied to.
    pub fn new(field: impl Into<String>, value: Value, source: CastFailure) -> Self {
        let value_kind = ValueKind::of(&value);
        Self {
            field: field.into(),
            value,
            value_kind,
            source,
        }
    }
}

/// Why a single cast failed.
#[derive(Error, Debug)]
pub enum CastFailure {
    /// The caster does not accept values of this kind.
    #[error("{target} cannot be built from a {kind} value")]
    Unsupported {
        /// What the caster produces.
        target: &'static str,
        /// Kind of the rejected value.
        kind: ValueKind,
    },

    /// A string could not be parsed.
    #[error("invalid {target} literal {literal:?}: {reason}")]
    InvalidLiteral {
        /// What the caster produces.
        target: &'static str,
        /// The rejected text.
        literal: String,
        /// Parser message.
        reason: String,
    },

    /// The value parsed but does not fit the target.
    #[error("{value} is out of range for {target}")]
    OutOfRange {
        /// What the caster produces.
        target: &'static str,
        /// Rendered value.
        value: String,
    },

    /// A user-supplied caster returned an error.
    #[error("{0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Error raised while declaring or configuring a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field identifier is not usable as a record field.
    #[error("invalid field name {name:?}: {reason}")]
    InvalidFieldName {
        /// The rejected identifier.
        name: String,
        /// Which rule it broke.
        reason: &'static str,
    },

    /// The same field was declared twice.
    #[error("{schema} declares field '{field}' more than once")]
    DuplicateField {
        /// Schema title.
        schema: String,
        /// The repeated identifier.
        field: String,
    },

    /// No fields were declared.
    #[error("{schema} declares no fields")]
    Empty {
        /// Schema title.
        schema: String,
    },

    /// A configuration call named fields the schema does not have.
    #[error("{schema} has no fields {}", render_set(.invalid))]
    UnknownFields {
        /// Schema title.
        schema: String,
        /// The unknown names.
        invalid: BTreeSet<String>,
    },

    /// A configuration call supplied more positional entries than fields.
    #[error("{schema} takes {expected} positional {what} but {got} were given")]
    TooManyValues {
        /// Schema title.
        schema: String,
        /// What was being configured (`"types"` or `"defaults"`).
        what: &'static str,
        /// Number of declared fields.
        expected: usize,
        /// Number of positional entries supplied.
        got: usize,
    },

    /// A default was declared on a strict schema.
    #[error("{schema} is strict; field '{field}' cannot declare a default")]
    DefaultOnStrict {
        /// Schema title.
        schema: String,
        /// The field carrying the default.
        field: String,
    },

    /// A schema definition named a caster that does not exist.
    #[error("field '{field}' uses unknown caster '{label}'")]
    UnknownCaster {
        /// The field carrying the label.
        field: String,
        /// The unrecognised label.
        label: String,
    },

    /// A schema definition document could not be parsed.
    #[error("cannot parse schema definition: {0}")]
    Definition(String),
}

fn render_set(set: &BTreeSet<String>) -> String {
    let items: Vec<&str> = set.iter().map(String::as_str).collect();
    format!("{{{}}}", items.join(", "))
}
