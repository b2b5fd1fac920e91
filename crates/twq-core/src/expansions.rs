//! Expansion selector: relations to follow plus nested target-field selections.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::QueryResult;
use crate::parameter::{QueryParameter, QueryParameters};
use crate::schema::{EXPANSIONS_PARAMETER, Expansion, Relation};

/// A chosen subset of an entity type's relations.
///
/// Keyed by relation: re-adding a relation replaces the earlier entry and
/// its nested selection (last write wins). Relations serialize in catalogue
/// order.
#[derive(Clone, PartialEq, Eq)]
pub struct ExpansionSelector<X: Expansion> {
    chosen: BTreeMap<X::Relation, X>,
}

impl<X: Expansion> ExpansionSelector<X> {
    /// Selector with no relations chosen.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            chosen: BTreeMap::new(),
        }
    }

    /// Return a selector that also expands `expansion`.
    #[must_use]
    pub fn add(mut self, expansion: X) -> Self {
        self.insert(expansion);
        self
    }

    /// Return a selector that also expands `relation`, with no nested fields.
    #[must_use]
    pub fn add_relation(self, relation: X::Relation) -> Self {
        self.add(X::bare(relation))
    }

    /// Record `expansion` in place, returning the entry it replaced.
    pub fn insert(&mut self, expansion: X) -> Option<X> {
        self.chosen.insert(expansion.relation(), expansion)
    }

    /// Drop the entry for `relation`.
    pub fn remove(&mut self, relation: X::Relation) -> Option<X> {
        self.chosen.remove(&relation)
    }

    #[must_use]
    pub fn contains(&self, relation: X::Relation) -> bool {
        self.chosen.contains_key(&relation)
    }

    #[must_use]
    pub fn get(&self, relation: X::Relation) -> Option<&X> {
        self.chosen.get(&relation)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Chosen expansions in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &X> + '_ {
        self.chosen.values()
    }

    /// Chosen relations in catalogue order.
    pub fn relations(&self) -> impl Iterator<Item = X::Relation> + '_ {
        self.chosen.keys().copied()
    }

    /// Build from textual `(relation, nested fields)` entries.
    ///
    /// Relations are checked against the source catalogue and nested tokens
    /// against the target catalogue; later entries replace earlier ones.
    pub fn parse<'a, I, S>(entries: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [S])>,
        S: AsRef<str> + 'a,
    {
        let mut selector = Self::empty();
        for (relation, nested) in entries {
            let relation = <X::Relation as Relation>::lookup(relation)?;
            selector.insert(X::from_parts(relation, nested)?);
        }
        Ok(selector)
    }

    /// The `expansions` parameter, or `None` when nothing is chosen.
    #[must_use]
    pub fn to_expansions_parameter(&self) -> Option<QueryParameter> {
        if self.is_empty() {
            return None;
        }
        Some(QueryParameter::new(
            EXPANSIONS_PARAMETER,
            self.relations().map(<X::Relation as Relation>::as_str),
        ))
    }

    /// One field parameter per distinct target type with a non-empty nested
    /// selection, merged across relations sharing a target.
    #[must_use]
    pub fn nested_parameters(&self) -> QueryParameters {
        let mut params: QueryParameters = self
            .iter()
            .filter_map(<X as Expansion>::nested_parameter)
            .collect();
        params.canonicalize(<X::Relation as Relation>::ENTITY);
        params
    }

    /// `expansions` followed by the nested field parameters.
    #[must_use]
    pub fn to_query_parameters(&self) -> QueryParameters {
        let mut params = QueryParameters::new();
        if let Some(expansions) = self.to_expansions_parameter() {
            params.insert(expansions);
        }
        params.append(self.nested_parameters());
        params
    }
}

impl<X: Expansion> Default for ExpansionSelector<X> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<X: Expansion> fmt::Debug for ExpansionSelector<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.chosen.values()).finish()
    }
}

impl<X: Expansion> FromIterator<X> for ExpansionSelector<X> {
    fn from_iter<I: IntoIterator<Item = X>>(iter: I) -> Self {
        let mut selector = Self::empty();
        selector.extend(iter);
        selector
    }
}

impl<X: Expansion> Extend<X> for ExpansionSelector<X> {
    fn extend<I: IntoIterator<Item = X>>(&mut self, iter: I) {
        for expansion in iter {
            self.insert(expansion);
        }
    }
}
