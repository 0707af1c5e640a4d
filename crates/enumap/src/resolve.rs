//! # Resolve
//!
//! Merges a call's positional and keyword values against the declared
//! names. Positional values bind to names in order, keyword values bind by
//! name and override positional ones. Every caller (construction calls,
//! `set_types`, `set_defaults`) starts from [`merge`]; the construction
//! calls then apply the strict or sparse fill policy.
//!
//! ## Rules
//!
//! 1. More positional values than names is reported before anything else,
//!    even when the surplus would otherwise be harmless.
//! 2. Strict: every name must be bound. Missing and invalid names are
//!    reported together in one `SchemaMismatch`.
//! 3. Sparse: unbound names take their registered default, or `null` when
//!    none is registered. Invalid keyword names are still an error.

use std::collections::BTreeSet;
use std::sync::Arc;

use enumap_core::{EnumapError, FieldName};
use serde_json::Value;

use crate::args::Args;
use crate::record::{FieldMap, Record, RecordShape};
use crate::registry::DefaultRegistry;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSource {
    /// Bound by position.
    Positional,
    /// Bound by keyword, possibly overriding a positional value.
    Keyword,
    /// Filled from the schema's registered default.
    Default,
    /// Filled with `null`: nothing supplied and no default registered.
    Absent,
}

impl FieldSource {
    /// True if the caller supplied the value, by position or keyword.
    pub fn is_supplied(&self) -> bool {
        matches!(self, Self::Positional | Self::Keyword)
    }
}

/// A validated binding of every declared field for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub(crate) shape: Arc<RecordShape>,
    pub(crate) values: Vec<Value>,
    pub(crate) sources: Vec<FieldSource>,
}

impl Resolved {
    /// Resolved value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.shape.position(name).and_then(|i| self.values.get(i))
    }

    /// Where a field's value came from.
    pub fn source(&self, name: &str) -> Option<FieldSource> {
        self.shape.position(name).and_then(|i| self.sources.get(i).copied())
    }

    /// `(field, value, source)` triples in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value, FieldSource)> {
        self.shape
            .fields()
            .iter()
            .zip(self.values.iter())
            .zip(self.sources.iter().copied())
            .map(|((name, value), source)| (name, value, source))
    }

    /// Materialize as a by-name map in declared order.
    pub fn into_map(self) -> FieldMap {
        self.shape
            .fields()
            .iter()
            .map(FieldName::to_string)
            .zip(self.values)
            .collect()
    }

    /// Materialize as a fixed-shape record.
    pub fn into_record(self) -> Record {
        Record::new(self.shape, self.values)
    }
}

/// Values bound to declared positions, before any fill policy.
pub(crate) struct Merged<T> {
    pub slots: Vec<Option<(T, FieldSource)>>,
    pub invalid: BTreeSet<String>,
}

/// More positional values than declared names.
pub(crate) struct Overflow {
    pub expected: usize,
    pub got: usize,
}

pub(crate) fn merge<T>(shape: &RecordShape, args: Args<T>) -> Result<Merged<T>, Overflow> {
    let (positional, keyword) = args.into_parts();
    if positional.len() > shape.len() {
        return Err(Overflow {
            expected: shape.len(),
            got: positional.len(),
        });
    }

    let mut slots: Vec<Option<(T, FieldSource)>> =
        std::iter::repeat_with(|| None).take(shape.len()).collect();
    for (slot, value) in slots.iter_mut().zip(positional) {
        *slot = Some((value, FieldSource::Positional));
    }

    let mut invalid = BTreeSet::new();
    for (name, value) in keyword {
        match shape.position(&name) {
            Some(i) => slots[i] = Some((value, FieldSource::Keyword)),
            None => {
                invalid.insert(name);
            }
        }
    }

    Ok(Merged { slots, invalid })
}

fn too_many(shape: &RecordShape, overflow: Overflow) -> EnumapError {
    EnumapError::TooManyArguments {
        schema: shape.title().to_string(),
        expected: overflow.expected,
        got: overflow.got,
    }
}

fn mismatch(
    shape: &RecordShape,
    missing: BTreeSet<String>,
    invalid: BTreeSet<String>,
) -> EnumapError {
    EnumapError::SchemaMismatch {
        schema: shape.title().to_string(),
        expected: shape.fields().iter().map(FieldName::to_string).collect(),
        missing,
        invalid,
    }
}

/// Resolve a call that must bind every declared name.
pub(crate) fn resolve_strict(
    shape: &Arc<RecordShape>,
    args: Args,
) -> Result<Resolved, EnumapError> {
    let Merged { slots, invalid } = merge(shape, args).map_err(|o| too_many(shape, o))?;

    let missing: BTreeSet<String> = shape
        .fields()
        .iter()
        .zip(slots.iter())
        .filter(|(_, slot)| slot.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() || !invalid.is_empty() {
        return Err(mismatch(shape, missing, invalid));
    }

    let (values, sources) = slots.into_iter().flatten().unzip();
    Ok(Resolved {
        shape: Arc::clone(shape),
        values,
        sources,
    })
}

/// Resolve a call, filling unbound names from `defaults`.
pub(crate) fn resolve_sparse(
    shape: &Arc<RecordShape>,
    defaults: &DefaultRegistry,
    args: Args,
) -> Result<Resolved, EnumapError> {
    let Merged { slots, invalid } = merge(shape, args).map_err(|o| too_many(shape, o))?;
    if !invalid.is_empty() {
        return Err(mismatch(shape, BTreeSet::new(), invalid));
    }

    let (values, sources) = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(bound) => bound,
            None => match defaults.get_index(i) {
                Some(default) => (default.clone(), FieldSource::Default),
                None => (Value::Null, FieldSource::Absent),
            },
        })
        .unzip();
    Ok(Resolved {
        shape: Arc::clone(shape),
        values,
        sources,
    })
}
