//! # Cast
//!
//! Applies the type registry to a resolved binding. Only values the caller
//! supplied are cast: defaults and absent fields are already in final form,
//! even when the field has a caster. Casting walks fields in declared order
//! and stops at the first failure, so the reported field is deterministic
//! and no partially-cast output escapes.

use enumap_core::{CastError, EnumapError};

use crate::registry::TypeRegistry;
use crate::resolve::Resolved;

impl Resolved {
    /// Cast every supplied value that has a registered caster.
    ///
    /// # Errors
    ///
    /// Returns `EnumapError::Cast` for the first field, in declared order,
    /// whose caster fails. The error carries the uncast value.
    pub fn cast(mut self, types: &TypeRegistry) -> Result<Self, EnumapError> {
        for (position, (value, source)) in
            self.values.iter_mut().zip(self.sources.iter()).enumerate()
        {
            if !source.is_supplied() {
                continue;
            }
            let Some(caster) = types.get_index(position) else {
                continue;
            };
            match caster.apply(value) {
                Ok(cast) => *value = cast,
                Err(failure) => {
                    let field = self.shape.fields()[position].to_string();
                    tracing::debug!(
                        schema = %self.shape.title(),
                        field = %field,
                        caster = %caster.label(),
                        "cast failed"
                    );
                    return Err(CastError::new(field, value.clone(), failure).into());
                }
            }
        }
        Ok(self)
    }
}
