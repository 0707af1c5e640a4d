//! # Schemas
//!
//! `FieldSchema` (strict) and `SparseFieldSchema` (relaxed) are the two
//! schema handles. Both implement [`Enumap`], which provides the four output
//! operations on top of each handle's `resolve`.
//!
//! ## Configuration and sharing
//!
//! `set_types` and `set_defaults` take `&mut self`, so configuration can
//! only happen while nothing else holds the schema. Configure during setup,
//! then share the schema (for example behind an `Arc`) for concurrent
//! construction calls; schemas are `Send + Sync`.
//!
//! ## Inline declarations
//!
//! Casters and defaults given on a [`FieldSpec`] seed the registries when
//! the schema is built. A later `set_types` or `set_defaults` call replaces
//! the whole registry, inline entries included.

use std::sync::Arc;

use enumap_core::{EnumapError, FieldName, SchemaError};
use serde_json::Value;

use crate::args::{Args, TypeArgs};
use crate::caster::Caster;
use crate::record::{FieldMap, Record, RecordShape};
use crate::registry::{DefaultRegistry, TypeRegistry};
use crate::resolve::{resolve_sparse, resolve_strict, Resolved};

/// Operations shared by strict and sparse schemas.
pub trait Enumap {
    /// The shape shared by every record this schema produces.
    fn record_shape(&self) -> &Arc<RecordShape>;

    /// The schema's caster registry.
    fn types(&self) -> &TypeRegistry;

    /// Bind a call's values to the declared names.
    fn resolve(&self, args: Args) -> Result<Resolved, EnumapError>;

    /// Schema title.
    fn title(&self) -> &str {
        self.record_shape().title()
    }

    /// Declared names, in declaration order.
    fn names(&self) -> &[FieldName] {
        self.record_shape().fields()
    }

    /// Number of declared fields.
    fn len(&self) -> usize {
        self.record_shape().len()
    }

    /// Always false: schemas declare at least one field.
    fn is_empty(&self) -> bool {
        self.record_shape().is_empty()
    }

    /// True if `name` is a declared field.
    fn contains(&self, name: &str) -> bool {
        self.record_shape().position(name).is_some()
    }

    /// Declared position of `name`.
    fn position(&self, name: &str) -> Option<usize> {
        self.record_shape().position(name)
    }

    /// Ordered map of the call's values, keyed by declared name.
    fn map(&self, args: Args) -> Result<FieldMap, EnumapError> {
        Ok(self.resolve(args)?.into_map())
    }

    /// Like [`Enumap::map`], with supplied values cast first.
    fn map_casted(&self, args: Args) -> Result<FieldMap, EnumapError> {
        Ok(self.resolve(args)?.cast(self.types())?.into_map())
    }

    /// Fixed-shape record of the call's values, in declared order.
    fn record(&self, args: Args) -> Result<Record, EnumapError> {
        Ok(self.resolve(args)?.into_record())
    }

    /// Like [`Enumap::record`], with supplied values cast first.
    fn record_casted(&self, args: Args) -> Result<Record, EnumapError> {
        Ok(self.resolve(args)?.cast(self.types())?.into_record())
    }
}

/// A schema that requires every field on every call.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    shape: Arc<RecordShape>,
    types: TypeRegistry,
}

impl FieldSchema {
    /// Declare a schema from a whitespace- or comma-separated name list.
    ///
    /// ```
    /// use enumap::{Args, Enumap, FieldSchema};
    ///
    /// let fruit = FieldSchema::new("Fruit", "apple orange papaya").unwrap();
    /// let record = fruit
    ///     .record(Args::positional(["heart-shaped", "spherical"]).keyword("papaya", "ellipsoid"))
    ///     .unwrap();
    /// assert_eq!(record.get("papaya").unwrap(), "ellipsoid");
    /// ```
    pub fn new(title: &str, declaration: &str) -> Result<Self, SchemaError> {
        Self::from_field_names(title, FieldName::parse_list(declaration)?)
    }

    /// Declare a schema from any sequence of names, such as another
    /// schema's `names()`.
    pub fn from_names<I, N>(title: &str, names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let fields = names
            .into_iter()
            .map(|n| FieldName::new(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_field_names(title, fields)
    }

    fn from_field_names(title: &str, fields: Vec<FieldName>) -> Result<Self, SchemaError> {
        let shape = Arc::new(RecordShape::new(title, fields)?);
        let types = TypeRegistry::empty(Arc::clone(&shape));
        declared(&shape, "strict");
        Ok(Self { shape, types })
    }

    /// Start a builder for a schema with inline casters.
    pub fn builder(title: &str) -> SchemaBuilder {
        SchemaBuilder::new(title)
    }

    /// Replace the caster registry.
    ///
    /// Positional casters bind to names in order, keyword casters override
    /// them. `None` entries leave the field uncast.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownFields` for keyword names outside the
    /// schema and `SchemaError::TooManyValues` for surplus positional
    /// entries. The registry is unchanged on error.
    pub fn set_types(&mut self, types: TypeArgs) -> Result<(), SchemaError> {
        self.types = TypeRegistry::from_args(Arc::clone(&self.shape), types)?;
        tracing::debug!(schema = %self.shape.title(), typed = self.types.len(), "types replaced");
        Ok(())
    }
}

impl Enumap for FieldSchema {
    fn record_shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    fn types(&self) -> &TypeRegistry {
        &self.types
    }

    fn resolve(&self, args: Args) -> Result<Resolved, EnumapError> {
        resolve_strict(&self.shape, args)
    }
}

/// A schema that fills unsupplied fields from defaults, or `null`.
#[derive(Debug, Clone)]
pub struct SparseFieldSchema {
    shape: Arc<RecordShape>,
    types: TypeRegistry,
    defaults: DefaultRegistry,
}

impl SparseFieldSchema {
    /// Declare a sparse schema from a whitespace- or comma-separated name list.
    pub fn new(title: &str, declaration: &str) -> Result<Self, SchemaError> {
        Self::from_field_names(title, FieldName::parse_list(declaration)?)
    }

    /// Declare a sparse schema from any sequence of names.
    pub fn from_names<I, N>(title: &str, names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let fields = names
            .into_iter()
            .map(|n| FieldName::new(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_field_names(title, fields)
    }

    fn from_field_names(title: &str, fields: Vec<FieldName>) -> Result<Self, SchemaError> {
        let shape = Arc::new(RecordShape::new(title, fields)?);
        let types = TypeRegistry::empty(Arc::clone(&shape));
        let defaults = DefaultRegistry::empty(Arc::clone(&shape));
        declared(&shape, "sparse");
        Ok(Self {
            shape,
            types,
            defaults,
        })
    }

    /// Start a builder for a schema with inline casters and defaults.
    pub fn builder(title: &str) -> SchemaBuilder {
        SchemaBuilder::new(title)
    }

    /// Replace the caster registry. See [`FieldSchema::set_types`].
    pub fn set_types(&mut self, types: TypeArgs) -> Result<(), SchemaError> {
        self.types = TypeRegistry::from_args(Arc::clone(&self.shape), types)?;
        tracing::debug!(schema = %self.shape.title(), typed = self.types.len(), "types replaced");
        Ok(())
    }

    /// Replace the default registry.
    ///
    /// Positional defaults bind to names in order, keyword defaults override
    /// them. Fields left out have no default and resolve to `null`.
    ///
    /// # Errors
    ///
    /// Same as [`FieldSchema::set_types`]; the registry is unchanged on error.
    pub fn set_defaults(&mut self, defaults: Args) -> Result<(), SchemaError> {
        self.defaults = DefaultRegistry::from_args(Arc::clone(&self.shape), defaults)?;
        tracing::debug!(
            schema = %self.shape.title(),
            defaulted = self.defaults.len(),
            "defaults replaced"
        );
        Ok(())
    }

    /// Every field mapped to its default, `null` where none is registered.
    pub fn defaults(&self) -> FieldMap {
        self.defaults.to_map()
    }

    /// Only the registered defaults.
    pub fn declared_defaults(&self) -> &DefaultRegistry {
        &self.defaults
    }
}

impl Enumap for SparseFieldSchema {
    fn record_shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    fn types(&self) -> &TypeRegistry {
        &self.types
    }

    fn resolve(&self, args: Args) -> Result<Resolved, EnumapError> {
        resolve_sparse(&self.shape, &self.defaults, args)
    }
}

fn declared(shape: &RecordShape, kind: &'static str) {
    tracing::debug!(schema = %shape.title(), fields = shape.len(), kind, "schema declared");
}

/// One field declaration for [`SchemaBuilder`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    caster: Option<Caster>,
    default: Option<Value>,
}

impl FieldSpec {
    /// A field with no caster and no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caster: None,
            default: None,
        }
    }

    /// Cast supplied values of this field with `caster`.
    pub fn with_caster(mut self, caster: Caster) -> Self {
        self.caster = Some(caster);
        self
    }

    /// Fill this field with `default` when unsupplied. Sparse schemas only.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl From<&str> for FieldSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Declares a schema field by field.
///
/// ```
/// use enumap::{Args, Caster, Enumap, FieldSpec, SparseFieldSchema};
///
/// let order = SparseFieldSchema::builder("Order")
///     .field(FieldSpec::new("index").with_caster(Caster::int()))
///     .field(FieldSpec::new("cost").with_caster(Caster::float()))
///     .field(FieldSpec::new("due_on").with_default("unscheduled"))
///     .build_sparse()
///     .unwrap();
/// let record = order.record_casted(Args::positional(["12", "142.22"])).unwrap();
/// assert_eq!(record.get("index").unwrap(), 12);
/// assert_eq!(record.get("due_on").unwrap(), "unscheduled");
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    title: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// A builder with no fields yet.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, spec: impl Into<FieldSpec>) -> Self {
        self.fields.push(spec.into());
        self
    }

    /// Append several fields.
    pub fn fields<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldSpec>,
    {
        self.fields.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Build a strict schema.
    ///
    /// # Errors
    ///
    /// Fails on invalid or duplicate names, an empty field list, or any
    /// field carrying a default (`SchemaError::DefaultOnStrict`).
    pub fn build_strict(self) -> Result<FieldSchema, SchemaError> {
        if let Some(spec) = self.fields.iter().find(|f| f.default.is_some()) {
            return Err(SchemaError::DefaultOnStrict {
                schema: self.title,
                field: spec.name.clone(),
            });
        }
        let (shape, casters, _) = self.into_parts()?;
        let types = TypeRegistry::from_slots(Arc::clone(&shape), casters);
        declared(&shape, "strict");
        Ok(FieldSchema { shape, types })
    }

    /// Build a sparse schema.
    ///
    /// # Errors
    ///
    /// Fails on invalid or duplicate names or an empty field list.
    pub fn build_sparse(self) -> Result<SparseFieldSchema, SchemaError> {
        let (shape, casters, defaults) = self.into_parts()?;
        let types = TypeRegistry::from_slots(Arc::clone(&shape), casters);
        let defaults = DefaultRegistry::from_slots(Arc::clone(&shape), defaults);
        declared(&shape, "sparse");
        Ok(SparseFieldSchema {
            shape,
            types,
            defaults,
        })
    }

    #[allow(clippy::type_complexity)]
    fn into_parts(
        self,
    ) -> Result<(Arc<RecordShape>, Vec<Option<Caster>>, Vec<Option<Value>>), SchemaError> {
        let mut names = Vec::with_capacity(self.fields.len());
        let mut casters = Vec::with_capacity(self.fields.len());
        let mut defaults = Vec::with_capacity(self.fields.len());
        for spec in self.fields {
            names.push(FieldName::new(spec.name)?);
            casters.push(spec.caster);
            defaults.push(spec.default);
        }
        let shape = Arc::new(RecordShape::new(&self.title, names)?);
        Ok((shape, casters, defaults))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn abc() -> FieldSchema {
        FieldSchema::new("a", "b c e").unwrap()
    }

    #[test]
    fn test_names_keep_declaration_order() {
        let schema = abc();
        let names: Vec<&str> = schema.names().iter().map(FieldName::as_str).collect();
        assert_eq!(names, ["b", "c", "e"]);
    }

    #[test]
    fn test_duplicate_names_rejected_at_declaration() {
        let err = FieldSchema::new("a", "b c b").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { ref field, .. } if field == "b"));
        assert!(SparseFieldSchema::new("a", "x x").is_err());
    }

    #[test]
    fn test_map_and_record() {
        let a = abc();
        let map = a.map(Args::positional([1, 2, 3]).keyword("e", 33)).unwrap();
        assert_eq!(
            map.into_iter().collect::<Vec<_>>(),
            vec![
                ("b".to_string(), json!(1)),
                ("c".to_string(), json!(2)),
                ("e".to_string(), json!(33))
            ]
        );
        let record = a.record(Args::positional([1, 2, 3]).keyword("e", 33)).unwrap();
        assert_eq!(record, vec![json!(1), json!(2), json!(33)]);
    }

    #[test]
    fn test_set_types_replaces_registry() {
        let mut a = abc();
        a.set_types(Args::positional([Caster::int(), Caster::int(), Caster::float()]))
            .unwrap();
        assert_eq!(a.types().len(), 3);
        a.set_types(Args::new().keyword("c", Caster::string())).unwrap();
        assert_eq!(a.types().labels(), [("c", "str")]);
    }

    #[test]
    fn test_failed_set_types_keeps_old_registry() {
        let mut a = abc();
        a.set_types(Args::positional([Caster::int()])).unwrap();
        assert!(a.set_types(Args::new().keyword("zz", Caster::int())).is_err());
        assert_eq!(a.types().labels(), [("b", "int")]);
    }

    #[test]
    fn test_strict_from_sparse_names() {
        let sparse = SparseFieldSchema::new("ToopSparse", "a b c d").unwrap();
        let strict = FieldSchema::from_names("Toop", sparse.names()).unwrap();
        assert_eq!(strict.names(), sparse.names());
        assert_eq!(strict.title(), "Toop");
    }

    #[test]
    fn test_builder_seeds_registries() {
        let schema = SchemaBuilder::new("Order")
            .field(FieldSpec::new("index").with_caster(Caster::int()))
            .field("note")
            .field(FieldSpec::new("due_on").with_default("soon"))
            .build_sparse()
            .unwrap();
        assert_eq!(schema.types().labels(), [("index", "int")]);
        assert_eq!(schema.defaults().get("due_on"), Some(&json!("soon")));
        assert_eq!(schema.defaults().get("note"), Some(&Value::Null));
        assert_eq!(schema.declared_defaults().len(), 1);
    }

    #[test]
    fn test_strict_builder_rejects_defaults() {
        let err = SchemaBuilder::new("Order")
            .fields(["a", "b"])
            .field(FieldSpec::new("c").with_default(1))
            .build_strict()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DefaultOnStrict {
                schema: "Order".to_string(),
                field: "c".to_string()
            }
        );
    }

    #[test]
    fn test_explicit_defaults_replace_inline_defaults() {
        let mut schema = SchemaBuilder::new("S")
            .field(FieldSpec::new("a").with_default(1))
            .field(FieldSpec::new("b").with_default(2))
            .build_sparse()
            .unwrap();
        schema.set_defaults(Args::new().keyword("b", 20)).unwrap();
        let record = schema.record(Args::new()).unwrap();
        assert_eq!(record, vec![Value::Null, json!(20)]);
    }

    #[test]
    fn test_introspection() {
        let a = abc();
        assert_eq!(a.len(), 3);
        assert!(!a.is_empty());
        assert!(a.contains("c"));
        assert!(!a.contains("d"));
        assert_eq!(a.position("e"), Some(2));
        assert_eq!(a.record_shape().name(), "a_record");
    }

    #[test]
    fn test_schemas_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldSchema>();
        assert_send_sync::<SparseFieldSchema>();
    }
}
