//! # Type and Default Registries
//!
//! Per-schema configuration, stored aligned to the declared field order so
//! lookups during resolve and cast are by position.
//!
//! Both registries are built through the same merge as a construction
//! call: positional entries bind in order, keyword entries override them,
//! unknown names are rejected. Unlike a strict construction call, partial
//! coverage is fine. A `None` type entry means "no cast" and is not stored.
//!
//! Each `set_*` call replaces the whole registry.

use std::sync::Arc;

use enumap_core::{FieldName, SchemaError};
use serde_json::Value;

use crate::args::{Args, TypeArgs};
use crate::caster::Caster;
use crate::record::{FieldMap, RecordShape};
use crate::resolve::{merge, Merged};

fn merge_config<T>(
    shape: &RecordShape,
    what: &'static str,
    args: Args<T>,
) -> Result<Vec<Option<T>>, SchemaError> {
    let Merged { slots, invalid } = merge(shape, args).map_err(|o| SchemaError::TooManyValues {
        schema: shape.title().to_string(),
        what,
        expected: o.expected,
        got: o.got,
    })?;
    if !invalid.is_empty() {
        return Err(SchemaError::UnknownFields {
            schema: shape.title().to_string(),
            invalid,
        });
    }
    Ok(slots
        .into_iter()
        .map(|slot| slot.map(|(value, _)| value))
        .collect())
}

/// Field name to caster, for fields that are cast.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    shape: Arc<RecordShape>,
    casters: Vec<Option<Caster>>,
}

impl TypeRegistry {
    pub(crate) fn empty(shape: Arc<RecordShape>) -> Self {
        let casters = vec![None; shape.len()];
        Self { shape, casters }
    }

    pub(crate) fn from_slots(shape: Arc<RecordShape>, casters: Vec<Option<Caster>>) -> Self {
        debug_assert_eq!(shape.len(), casters.len());
        Self { shape, casters }
    }

    pub(crate) fn from_args(shape: Arc<RecordShape>, args: TypeArgs) -> Result<Self, SchemaError> {
        let casters = merge_config(&shape, "types", args)?
            .into_iter()
            .map(Option::flatten)
            .collect();
        Ok(Self { shape, casters })
    }

    /// Caster registered for a field.
    pub fn get(&self, name: &str) -> Option<&Caster> {
        self.shape.position(name).and_then(|i| self.get_index(i))
    }

    pub(crate) fn get_index(&self, position: usize) -> Option<&Caster> {
        self.casters.get(position).and_then(Option::as_ref)
    }

    /// True if the field has a caster.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered `(field, caster)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Caster)> {
        self.shape
            .fields()
            .iter()
            .zip(self.casters.iter())
            .filter_map(|(name, caster)| caster.as_ref().map(|c| (name, c)))
    }

    /// `(field, caster label)` pairs in declared order.
    pub fn labels(&self) -> Vec<(&str, &str)> {
        self.iter()
            .map(|(name, caster)| (name.as_str(), caster.label()))
            .collect()
    }

    /// Number of fields with a caster.
    pub fn len(&self) -> usize {
        self.casters.iter().filter(|c| c.is_some()).count()
    }

    /// True if no field is cast.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Field name to default value, for sparse schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultRegistry {
    shape: Arc<RecordShape>,
    defaults: Vec<Option<Value>>,
}

impl DefaultRegistry {
    pub(crate) fn empty(shape: Arc<RecordShape>) -> Self {
        let defaults = vec![None; shape.len()];
        Self { shape, defaults }
    }

    pub(crate) fn from_slots(shape: Arc<RecordShape>, defaults: Vec<Option<Value>>) -> Self {
        debug_assert_eq!(shape.len(), defaults.len());
        Self { shape, defaults }
    }

    pub(crate) fn from_args(shape: Arc<RecordShape>, args: Args) -> Result<Self, SchemaError> {
        let defaults = merge_config(&shape, "defaults", args)?;
        Ok(Self { shape, defaults })
    }

    /// Registered default for a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.shape.position(name).and_then(|i| self.get_index(i))
    }

    pub(crate) fn get_index(&self, position: usize) -> Option<&Value> {
        self.defaults.get(position).and_then(Option::as_ref)
    }

    /// Registered `(field, default)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.shape
            .fields()
            .iter()
            .zip(self.defaults.iter())
            .filter_map(|(name, default)| default.as_ref().map(|d| (name, d)))
    }

    /// Every field mapped to its default, `null` where none is registered.
    pub fn to_map(&self) -> FieldMap {
        self.shape
            .fields()
            .iter()
            .zip(self.defaults.iter())
            .map(|(name, default)| (name.to_string(), default.clone().unwrap_or(Value::Null)))
            .collect()
    }

    /// Number of fields with a registered default.
    pub fn len(&self) -> usize {
        self.defaults.iter().filter(|d| d.is_some()).count()
    }

    /// True if no default is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
