//! # Records and Record Shapes
//!
//! `RecordShape` is the ordered field list of a schema plus a name index.
//! It is built once when the schema is declared and shared by every record
//! the schema produces, so materializing a record never recomputes field
//! order.
//!
//! `Record` is the fixed-shape output: values in declared order, readable
//! by position or by field name. `FieldMap` is the by-name output.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use enumap_core::{FieldName, SchemaError};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Ordered map output: keys are the declared names, in declared order.
pub type FieldMap = IndexMap<String, Value>;

/// The ordered field list shared by a schema and its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    title: String,
    record_name: String,
    fields: Vec<FieldName>,
    index: HashMap<String, usize>,
}

impl RecordShape {
    /// Build a shape, rejecting empty and duplicated field lists.
    pub(crate) fn new(title: &str, fields: Vec<FieldName>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty {
                schema: title.to_string(),
            });
        }
        let mut index = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.to_string(), position).is_some() {
                return Err(SchemaError::DuplicateField {
                    schema: title.to_string(),
                    field: field.to_string(),
                });
            }
        }
        Ok(Self {
            title: title.to_string(),
            record_name: format!("{title}_record"),
            fields,
            index,
        })
    }

    /// Title of the schema this shape belongs to.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Name of the record type, `<title>_record`.
    pub fn name(&self) -> &str {
        &self.record_name
    }

    /// Declared fields, in order.
    pub fn fields(&self) -> &[FieldName] {
        &self.fields
    }

    /// Position of a field, if declared.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: a shape has at least one field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A fixed-shape record whose field order equals the schema's names.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: Arc<RecordShape>,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(shape: Arc<RecordShape>, values: Vec<Value>) -> Self {
        debug_assert_eq!(shape.len(), values.len());
        Self { shape, values }
    }

    /// The shape this record was built with.
    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    /// Value of a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.shape.position(name).and_then(|i| self.values.get(i))
    }

    /// Value at a position.
    pub fn get_index(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Values in field order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.shape.fields().iter().zip(self.values.iter())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: records have at least one field.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy into a by-name map in field order.
    pub fn to_map(&self) -> FieldMap {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Consume the record, returning its values in field order.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl PartialEq<Vec<Value>> for Record {
    fn eq(&self, other: &Vec<Value>) -> bool {
        &self.values == other
    }
}

impl PartialEq<[Value]> for Record {
    fn eq(&self, other: &[Value]) -> bool {
        self.values.as_slice() == other
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.values)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.shape.name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}
