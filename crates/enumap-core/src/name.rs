//! # Field Names
//!
//! `FieldName` is the validated identifier for a declared schema field.
//! Field names double as record field accessors, so they follow the
//! identifier rules of a record type: ASCII letters, digits and `_`, not
//! starting with a digit, and not starting with `_` (leading underscores
//! are reserved for record internals).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A validated schema field identifier.
///
/// The inner string is private; construct through [`FieldName::new`] or
/// [`FieldName::parse_list`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    /// Validate and wrap a field identifier.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidFieldName` if the name is empty, starts
    /// with a digit or an underscore, or contains anything other than ASCII
    /// alphanumerics and `_`.
    pub fn new(name: impl Into<String>) -> Result<Self, SchemaError> {
        let name = name.into();
        if let Some(reason) = identifier_violation(&name) {
            return Err(SchemaError::InvalidFieldName { name, reason });
        }
        Ok(Self(name))
    }

    /// Split a declaration string into field names.
    ///
    /// Names may be separated by whitespace, commas, or both, so
    /// `"b c e"` and `"b, c, e"` declare the same three fields. Order is
    /// preserved; duplicates are left for the schema to reject.
    pub fn parse_list(declaration: &str) -> Result<Vec<Self>, SchemaError> {
        declaration
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(Self::new)
            .collect()
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn identifier_violation(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return Some("field names must not be empty"),
    };
    if first == '_' {
        return Some("field names must not start with an underscore");
    }
    if first.is_ascii_digit() {
        return Some("field names must not start with a digit");
    }
    if !first.is_ascii_alphabetic() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("field names may only contain ASCII letters, digits and '_'");
    }
    None
}

impl TryFrom<String> for FieldName {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FieldName {
    type Error = SchemaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldName> for String {
    fn from(name: FieldName) -> Self {
        name.0
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for FieldName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
