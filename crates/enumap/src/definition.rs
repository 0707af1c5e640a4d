//! # Schema Definitions
//!
//! Declarative schema configuration loaded from YAML or JSON. A definition
//! names the schema, says whether it is sparse, and lists fields with an
//! optional built-in caster label and an optional default:
//!
//! ```yaml
//! name: Order
//! sparse: true
//! fields:
//!   - name: index
//!     type: int
//!   - name: cost
//!     type: float
//!   - name: due_on
//!     type: timestamp
//!     default: "1970-01-01T00:00:00Z"
//! ```
//!
//! Caster labels are resolved with [`Caster::from_label`]. Definitions only
//! describe schemas; values are still supplied through construction calls.

use std::sync::Arc;

use enumap_core::{EnumapError, SchemaError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::args::Args;
use crate::caster::Caster;
use crate::record::RecordShape;
use crate::registry::TypeRegistry;
use crate::resolve::Resolved;
use crate::schema::{Enumap, FieldSchema, FieldSpec, SchemaBuilder, SparseFieldSchema};

/// A schema declared in a configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    /// Schema title.
    pub name: String,
    /// Build a sparse schema instead of a strict one.
    #[serde(default)]
    pub sparse: bool,
    /// Fields in declared order.
    pub fields: Vec<FieldDefinition>,
}

/// One field of a [`SchemaDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    /// Field identifier.
    pub name: String,
    /// Built-in caster label.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub caster: Option<String>,
    /// Default value; sparse schemas only. A `default: null` key is an
    /// explicit null default, distinct from leaving the key out.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl SchemaDefinition {
    /// Parse a definition from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaError::Definition(e.to_string()))
    }

    /// Parse a definition from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::Definition(e.to_string()))
    }

    /// Translate into a builder, resolving caster labels.
    pub fn to_builder(&self) -> Result<SchemaBuilder, SchemaError> {
        let mut builder = SchemaBuilder::new(self.name.clone());
        for field in &self.fields {
            let mut spec = FieldSpec::new(field.name.clone());
            if let Some(label) = &field.caster {
                let caster =
                    Caster::from_label(label).ok_or_else(|| SchemaError::UnknownCaster {
                        field: field.name.clone(),
                        label: label.clone(),
                    })?;
                spec = spec.with_caster(caster);
            }
            if let Some(default) = &field.default {
                spec = spec.with_default(default.clone());
            }
            builder = builder.field(spec);
        }
        Ok(builder)
    }

    /// Build as a strict schema, ignoring the `sparse` flag.
    pub fn to_strict(&self) -> Result<FieldSchema, SchemaError> {
        self.to_builder()?.build_strict()
    }

    /// Build as a sparse schema, ignoring the `sparse` flag.
    pub fn to_sparse(&self) -> Result<SparseFieldSchema, SchemaError> {
        self.to_builder()?.build_sparse()
    }

    /// Build the schema kind the definition asks for.
    pub fn build(&self) -> Result<DefinedSchema, SchemaError> {
        if self.sparse {
            self.to_sparse().map(DefinedSchema::Sparse)
        } else {
            self.to_strict().map(DefinedSchema::Strict)
        }
    }
}

/// A schema built from a definition, strict or sparse.
#[derive(Debug, Clone)]
pub enum DefinedSchema {
    /// Built from a definition with `sparse: false`.
    Strict(FieldSchema),
    /// Built from a definition with `sparse: true`.
    Sparse(SparseFieldSchema),
}

impl DefinedSchema {
    /// True for sparse schemas.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }
}

impl Enumap for DefinedSchema {
    fn record_shape(&self) -> &Arc<RecordShape> {
        match self {
            Self::Strict(s) => s.record_shape(),
            Self::Sparse(s) => s.record_shape(),
        }
    }

    fn types(&self) -> &TypeRegistry {
        match self {
            Self::Strict(s) => s.types(),
            Self::Sparse(s) => s.types(),
        }
    }

    fn resolve(&self, args: Args) -> Result<Resolved, EnumapError> {
        match self {
            Self::Strict(s) => s.resolve(args),
            Self::Sparse(s) => s.resolve(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::FieldSource;
    use serde_json::json;

    const ORDER_YAML: &str = r#"
name: Order
sparse: true
fields:
  - name: index
    type: int
  - name: cost
    type: float
  - name: due_on
    type: timestamp
    default: "1970-01-01T00:00:00Z"
"#;

    #[test]
    fn test_yaml_definition_builds_sparse_schema() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let definition = SchemaDefinition::from_yaml_str(ORDER_YAML).unwrap();
        assert!(definition.sparse);
        let schema = definition.build().unwrap();
        assert!(schema.is_sparse());
        assert_eq!(
            schema.types().labels(),
            [("index", "int"), ("cost", "float"), ("due_on", "timestamp")]
        );

        let record = schema
            .record_casted(Args::positional(["12", "142.22"]))
            .unwrap();
        assert_eq!(
            record,
            vec![json!(12), json!(142.22), json!("1970-01-01T00:00:00Z")]
        );
    }

    #[test]
    fn test_json_definition_builds_strict_schema() {
        let definition = SchemaDefinition::from_json_str(
            r#"{"name": "Point", "fields": [{"name": "x", "type": "float"}, {"name": "y"}]}"#,
        )
        .unwrap();
        let schema = definition.build().unwrap();
        assert!(!schema.is_sparse());
        let map = schema.map_casted(Args::positional(["1.5", "2"])).unwrap();
        assert_eq!(map.get("x"), Some(&json!(1.5)));
        assert_eq!(map.get("y"), Some(&json!("2")));
    }

    #[test]
    fn test_unknown_caster_label() {
        let definition = SchemaDefinition::from_yaml_str(
            "name: Bad\nfields:\n  - name: cost\n    type: decimal\n",
        )
        .unwrap();
        let err = definition.build().unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownCaster {
                field: "cost".to_string(),
                label: "decimal".to_string()
            }
        );
    }

    #[test]
    fn test_strict_definition_rejects_default() {
        let definition = SchemaDefinition::from_yaml_str(
            "name: Bad\nfields:\n  - name: a\n    default: 1\n",
        )
        .unwrap();
        assert!(matches!(
            definition.build(),
            Err(SchemaError::DefaultOnStrict { .. })
        ));
        assert!(definition.to_sparse().is_ok());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            SchemaDefinition::from_yaml_str("name: [unclosed"),
            Err(SchemaError::Definition(_))
        ));
        assert!(matches!(
            SchemaDefinition::from_json_str(r#"{"name": "X", "fields": [], "extra": 1}"#),
            Err(SchemaError::Definition(_))
        ));
    }

    #[test]
    fn test_explicit_null_default_is_declared() {
        let definition = SchemaDefinition::from_yaml_str(
            "name: Nullable\nsparse: true\nfields:\n  - name: a\n    default: null\n  - name: b\n",
        )
        .unwrap();
        assert_eq!(definition.fields[0].default, Some(Value::Null));
        assert_eq!(definition.fields[1].default, None);

        let schema = definition.to_sparse().unwrap();
        assert_eq!(schema.declared_defaults().len(), 1);
        let resolved = schema.resolve(Args::new()).unwrap();
        assert_eq!(resolved.get("a"), Some(&Value::Null));
        assert_eq!(resolved.source("a"), Some(FieldSource::Default));
        assert_eq!(resolved.source("b"), Some(FieldSource::Absent));
    }

    #[test]
    fn test_explicit_null_default_survives_json_round_trip() {
        let definition = SchemaDefinition::from_json_str(
            r#"{"name": "N", "sparse": true, "fields": [{"name": "a", "default": null}]}"#,
        )
        .unwrap();
        let json = serde_json::to_string(&definition).unwrap();
        assert_eq!(SchemaDefinition::from_json_str(&json).unwrap(), definition);
    }

    #[test]
    fn test_definition_round_trips_through_json() {
        let definition = SchemaDefinition::from_yaml_str(ORDER_YAML).unwrap();
        let json = serde_json::to_string(&definition).unwrap();
        assert_eq!(SchemaDefinition::from_json_str(&json).unwrap(), definition);
    }
}
