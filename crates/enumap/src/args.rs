//! # Call Arguments
//!
//! `Args` bundles the positional and keyword halves of a call. The same
//! shape feeds construction calls (`Args<Value>`), `set_types`
//! (`Args<Option<Caster>>`) and `set_defaults` (`Args<Value>`), so all
//! three go through one merge against the declared names.

use serde_json::Value;

use crate::caster::Caster;

/// Arguments for `set_types`: `None` entries mean "no cast for this field".
pub type TypeArgs = Args<Option<Caster>>;

/// Positional values plus keyword values for one call.
///
/// Positional values are matched to declared names in order. Keyword
/// values are matched by name and override positional ones. When the same
/// keyword is given twice, the later one wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Args<T = Value> {
    positional: Vec<T>,
    keyword: Vec<(String, T)>,
}

impl<T> Args<T> {
    /// An empty argument list.
    pub fn new() -> Self {
        Self {
            positional: Vec::new(),
            keyword: Vec::new(),
        }
    }

    /// Start from a sequence of positional values.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<T>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: Vec::new(),
        }
    }

    /// Append one positional value.
    pub fn push(mut self, value: impl Into<T>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a keyword value.
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<T>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    /// Positional values, in call order.
    pub fn positional_values(&self) -> &[T] {
        &self.positional
    }

    /// Keyword values, in call order.
    pub fn keyword_values(&self) -> &[(String, T)] {
        &self.keyword
    }

    /// Total number of values supplied.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// True if no values were supplied at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<T>, Vec<(String, T)>) {
        (self.positional, self.keyword)
    }
}

impl<T> Default for Args<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Args<T> {
    fn from(positional: Vec<T>) -> Self {
        Self {
            positional,
            keyword: Vec::new(),
        }
    }
}

impl<T, V: Into<T>> FromIterator<V> for Args<T> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::positional(iter)
    }
}
