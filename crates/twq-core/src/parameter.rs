//! Wire-level query parameters.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::trace;

use crate::error::QueryError;
use crate::schema::{EXPANSIONS_PARAMETER, EntityType};

/// A single `(name, value)` query parameter whose value is a comma-joined
/// token list.
///
/// Incoming values are split on `,` into tokens, so a comma-joined value and
/// its separate tokens are the same parameter. Tokens are kept unique; empty
/// tokens are dropped. Whitespace is preserved and no percent-encoding is
/// applied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameter {
    name: String,
    values: Vec<String>,
}

impl QueryParameter {
    /// Create a parameter from a token list, collapsing duplicates in
    /// first-seen order.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut param = Self {
            name: name.into(),
            values: Vec::new(),
        };
        param.extend(values);
        param
    }

    /// Create a parameter by splitting a comma-joined value.
    pub fn parse(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, value.split(',').map(str::trim))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tokens in emission order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Comma-joined wire value.
    #[must_use]
    pub fn value(&self) -> String {
        self.values.join(",")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.values.iter().any(|v| v == token)
    }

    /// Stable sort by catalogue position; tokens without a rank keep their
    /// relative order after the ranked ones.
    pub(crate) fn sort_by_rank(&mut self, rank: impl Fn(&str) -> Option<usize>) {
        self.values
            .sort_by_key(|token| rank(token.as_str()).unwrap_or(usize::MAX));
    }

    /// Re-sort field and relation tokens into catalogue order.
    ///
    /// `root` is the entity type whose relation catalogue orders
    /// `expansions`. Opaque parameters are left untouched.
    pub(crate) fn canonicalize(&mut self, root: EntityType) {
        if let Some(entity) = EntityType::from_fields_parameter(&self.name) {
            self.sort_by_rank(|token| entity.field_rank(token));
        } else if self.name == EXPANSIONS_PARAMETER {
            self.sort_by_rank(|token| root.relation_rank(token));
        }
    }

    /// Consume into a transport-ready pair.
    #[must_use]
    pub fn into_pair(self) -> (String, String) {
        let value = self.value();
        (self.name, value)
    }

    fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            let value: String = value.into();
            for token in value.split(',') {
                if !token.is_empty() && !self.contains(token) {
                    self.values.push(token.to_owned());
                }
            }
        }
    }
}

impl fmt::Display for QueryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value())
    }
}

/// Parses `name=value` text into an opaque parameter. The value is split into
/// tokens like any other; a value without repeated or empty tokens comes back
/// out unchanged.
impl FromStr for QueryParameter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| QueryError::invalid_parameter(s, "expected `name=value`"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(QueryError::invalid_parameter(name, "name must not be empty"));
        }
        Ok(Self::new(name, [value.trim()]))
    }
}

/// Ordered list of query parameters with at most one entry per name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParameters(Vec<QueryParameter>);

impl QueryParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `param`, or union its tokens into the existing entry of the same
    /// name (existing tokens keep their position, new ones are appended).
    /// Empty parameters are ignored.
    pub fn insert(&mut self, param: QueryParameter) {
        if param.is_empty() {
            return;
        }
        if let Some(existing) = self.0.iter_mut().find(|p| p.name == param.name) {
            trace!(name = %param.name, "merging duplicate query parameter");
            existing.extend(param.values);
        } else {
            self.0.push(param);
        }
    }

    /// Insert every parameter from `params` in order.
    pub fn append(&mut self, params: Self) {
        for param in params.0 {
            self.insert(param);
        }
    }

    /// Look up a parameter by wire name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryParameter> {
        self.0.iter().find(|p| p.name == name)
    }

    /// Comma-joined value of the parameter named `name`.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<String> {
        self.get(name).map(QueryParameter::value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryParameter> {
        self.0.iter()
    }

    /// Parameter names in emission order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(QueryParameter::name).collect()
    }

    pub(crate) fn canonicalize(&mut self, root: EntityType) {
        for param in &mut self.0 {
            param.canonicalize(root);
        }
    }

    /// Consume into `(name, value)` pairs for the HTTP layer.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0.into_iter().map(QueryParameter::into_pair).collect()
    }
}

impl IntoIterator for QueryParameters {
    type Item = QueryParameter;
    type IntoIter = std::vec::IntoIter<QueryParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryParameters {
    type Item = &'a QueryParameter;
    type IntoIter = std::slice::Iter<'a, QueryParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<QueryParameter> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = QueryParameter>>(iter: I) -> Self {
        let mut params = Self::new();
        for param in iter {
            params.insert(param);
        }
        params
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{param}")?;
        }
        Ok(())
    }
}
