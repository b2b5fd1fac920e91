//! Field selector: a set of optional-field tokens for one entity type.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::QueryResult;
use crate::parameter::QueryParameter;
use crate::schema::Field;

/// A chosen subset of an entity type's optional fields.
///
/// Set semantics: adding a token twice is a no-op. Serialization always uses
/// canonical catalogue order, independent of insertion order.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldSelector<F: Field> {
    fields: BTreeSet<F>,
}

impl<F: Field> FieldSelector<F> {
    /// Selector with nothing selected.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            fields: BTreeSet::new(),
        }
    }

    /// Selector with the whole catalogue selected.
    #[must_use]
    pub fn all() -> Self {
        F::CATALOGUE.iter().copied().collect()
    }

    /// Return a selector that also includes `field`.
    #[must_use]
    pub fn add(mut self, field: F) -> Self {
        self.fields.insert(field);
        self
    }

    /// Include `field` in place. Returns `false` if it was already present.
    pub fn insert(&mut self, field: F) -> bool {
        self.fields.insert(field)
    }

    /// Drop `field`. Returns `true` if it was present.
    pub fn remove(&mut self, field: F) -> bool {
        self.fields.remove(&field)
    }

    #[must_use]
    pub fn contains(&self, field: F) -> bool {
        self.fields.contains(&field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Selected fields in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        self.fields.iter().copied()
    }

    /// Selected wire tokens in catalogue order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter().map(Field::as_str)
    }

    /// Union of two selections over the same catalogue.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.fields.union(&other.fields).copied().collect()
    }

    /// Build from textual tokens. Each item may itself be comma-joined.
    ///
    /// Fails on the first token that is not part of the catalogue.
    pub fn parse<I, S>(tokens: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selector = Self::empty();
        for item in tokens {
            for token in item.as_ref().split(',').map(str::trim) {
                if token.is_empty() {
                    continue;
                }
                selector.insert(F::lookup(token)?);
            }
        }
        Ok(selector)
    }

    /// Wire name this selector serializes under.
    #[must_use]
    pub fn parameter_name(&self) -> &'static str {
        F::parameter_name()
    }

    /// Serialize to the `<entity>.fields` parameter, or `None` when empty.
    #[must_use]
    pub fn to_query_parameter(&self) -> Option<QueryParameter> {
        if self.is_empty() {
            return None;
        }
        Some(QueryParameter::new(F::parameter_name(), self.tokens()))
    }
}

impl<F: Field> Default for FieldSelector<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Field> fmt::Debug for FieldSelector<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tokens()).finish()
    }
}

impl<F: Field> FromIterator<F> for FieldSelector<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<F: Field> Extend<F> for FieldSelector<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}

impl<F: Field, const N: usize> From<[F; N]> for FieldSelector<F> {
    fn from(fields: [F; N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<F: Field> Serialize for FieldSelector<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.tokens())
    }
}

impl<'de, F: Field> Deserialize<'de> for FieldSelector<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens = Vec::<String>::deserialize(deserializer)?;
        Self::parse(tokens).map_err(serde::de::Error::custom)
    }
}
