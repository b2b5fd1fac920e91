//! Selection documents: a serializable description of one query.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compose::QueryComposer;
use crate::entities::{Media, Place, Poll, Tweet, User};
use crate::error::{QueryError, QueryResult};
use crate::expansions::ExpansionSelector;
use crate::fields::FieldSelector;
use crate::parameter::QueryParameters;
use crate::schema::{EXPANSIONS_PARAMETER, Entity, EntityType};

/// `parameters` as a JSON object whose entries keep their document order.
mod ordered_parameters {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(params: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(params.iter().map(|(name, value)| (name, value)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of string parameter values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut params = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, String>()? {
                    params.push(entry);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Textual selection for one root entity type.
///
/// ```json
/// {
///   "entity": "user",
///   "fields": ["created_at", "protected"],
///   "expansions": [{"relation": "pinned_tweet_id", "fields": ["created_at"]}],
///   "parameters": {"max_results": "10"}
/// }
/// ```
///
/// Tokens are only checked when the document is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Root entity type
    pub entity: EntityType,

    /// Root optional fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Relations to expand, each optionally with target fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expansions: Vec<ExpansionEntry>,

    /// Opaque per-request parameters, emitted in document order
    #[serde(default, with = "ordered_parameters", skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<(String, String)>,
}

impl SelectionConfig {
    /// Empty selection rooted at `entity`.
    #[must_use]
    pub const fn new(entity: EntityType) -> Self {
        Self {
            entity,
            fields: Vec::new(),
            expansions: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> QueryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading selection config");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Pretty-printed JSON form.
    pub fn to_json_string(&self) -> QueryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fold `other` into this selection: fields and expansions append (later
    /// expansions of the same relation win on resolve), and so do parameters
    /// (same-name values union on resolve).
    pub fn merge(&mut self, other: Self) -> QueryResult<()> {
        if other.entity != self.entity {
            return Err(QueryError::Config(format!(
                "cannot merge a `{}` selection into a `{}` selection",
                other.entity, self.entity
            )));
        }
        self.fields.extend(other.fields);
        self.expansions.extend(other.expansions);
        self.parameters.extend(other.parameters);
        Ok(())
    }

    /// Resolve into a typed composer, validating every token.
    pub fn resolve<E: Entity>(&self) -> QueryResult<QueryComposer<E>> {
        if self.entity != E::TYPE {
            return Err(QueryError::Config(format!(
                "selection is rooted at `{}`, not `{}`",
                self.entity,
                E::TYPE
            )));
        }

        let fields = FieldSelector::<E::Field>::parse(&self.fields)?;
        let expansions = ExpansionSelector::<E::Expansion>::parse(
            self.expansions
                .iter()
                .map(|entry| (entry.relation.as_str(), entry.fields.as_slice())),
        )?;

        let mut composer = QueryComposer::<E>::new().fields(fields).expansions(expansions);
        for (name, value) in &self.parameters {
            composer = composer.parameter(name.as_str(), value.as_str())?;
        }
        Ok(composer)
    }

    /// Resolve against the runtime entity type and compose the parameters.
    pub fn compose(&self) -> QueryResult<QueryParameters> {
        match self.entity {
            EntityType::User => self.resolve::<User>()?.build(),
            EntityType::Tweet => self.resolve::<Tweet>()?.build(),
            EntityType::Media => self.resolve::<Media>()?.build(),
            EntityType::Poll => self.resolve::<Poll>()?.build(),
            EntityType::Place => self.resolve::<Place>()?.build(),
        }
    }
}

/// One expansion in a [`SelectionConfig`].
///
/// Deserializes from either a bare relation token or
/// `{"relation": ..., "fields": [...]}`; parses from `relation` or
/// `relation=field,field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawExpansionEntry")]
pub struct ExpansionEntry {
    pub relation: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl ExpansionEntry {
    #[must_use]
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

impl FromStr for ExpansionEntry {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (relation, fields) = match s.split_once('=') {
            Some((relation, fields)) => (relation, Some(fields)),
            None => (s, None),
        };
        let relation = relation.trim();
        if relation.is_empty() {
            return Err(QueryError::invalid_parameter(
                EXPANSIONS_PARAMETER,
                format!("missing relation in `{s}`"),
            ));
        }

        let fields = fields
            .into_iter()
            .flat_map(|f| f.split(','))
            .map(str::trim)
            .filter(|f| !f.is_empty());
        Ok(Self::new(relation).with_fields(fields))
    }
}

impl fmt::Display for ExpansionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relation)?;
        if !self.fields.is_empty() {
            write!(f, "={}", self.fields.join(","))?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExpansionEntry {
    Bare(String),
    Nested(NestedEntry),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NestedEntry {
    relation: String,
    #[serde(default)]
    fields: Vec<String>,
}

impl From<RawExpansionEntry> for ExpansionEntry {
    fn from(raw: RawExpansionEntry) -> Self {
        match raw {
            RawExpansionEntry::Bare(relation) => Self::new(relation),
            RawExpansionEntry::Nested(NestedEntry { relation, fields }) => Self { relation, fields },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserField;

    const USER_SELECTION: &str = r#"{
        "entity": "user",
        "fields": ["protected", "created_at"],
        "expansions": ["pinned_tweet_id", {"relation": "pinned_tweet_id", "fields": ["created_at"]}],
        "parameters": {"max_results": "10"}
    }"#;

    #[test]
    fn test_parse_document() {
        let config = SelectionConfig::from_json_str(USER_SELECTION).unwrap();
        assert_eq!(config.entity, EntityType::User);
        assert_eq!(config.expansions.len(), 2);
        assert_eq!(config.expansions[0], ExpansionEntry::new("pinned_tweet_id"));
        assert_eq!(config.expansions[1].fields, ["created_at"]);
    }

    #[test]
    fn test_compose_document() {
        let config = SelectionConfig::from_json_str(USER_SELECTION).unwrap();
        assert_eq!(
            config.compose().unwrap().to_string(),
            "user.fields=created_at,protected&expansions=pinned_tweet_id&tweet.fields=created_at&max_results=10"
        );
    }

    #[test]
    fn test_resolve_typed() {
        let config = SelectionConfig::from_json_str(USER_SELECTION).unwrap();
        let composer = config.resolve::<User>().unwrap();
        assert!(composer.field_selector().contains(UserField::Protected));
        assert_eq!(composer.expansion_selector().len(), 1);

        let err = config.resolve::<Tweet>().unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn test_unknown_document_key_rejected() {
        let err = SelectionConfig::from_json_str(r#"{"entity": "user", "field": []}"#).unwrap_err();
        assert!(matches!(err, QueryError::Json(_)));

        let err = SelectionConfig::from_json_str(
            r#"{"entity": "tweet", "expansions": [{"relation": "author_id", "field": ["url"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Json(_)));
    }

    #[test]
    fn test_unknown_tokens_fail_on_resolve() {
        let config = SelectionConfig::from_json_str(r#"{"entity": "poll", "fields": ["label"]}"#)
            .unwrap();
        let err = config.compose().unwrap_err();
        assert_eq!(err.to_string(), "unknown field `label` for entity `poll`");

        let config = SelectionConfig::from_json_str(
            r#"{"entity": "media", "expansions": ["author_id"]}"#,
        )
        .unwrap();
        assert!(config.compose().unwrap_err().is_schema_violation());
    }

    #[test]
    fn test_expansion_entry_text_form() {
        let entry: ExpansionEntry = "author_id=url, verified".parse().unwrap();
        assert_eq!(entry.relation, "author_id");
        assert_eq!(entry.fields, ["url", "verified"]);
        assert_eq!(entry.to_string(), "author_id=url,verified");

        let bare: ExpansionEntry = "geo.place_id".parse().unwrap();
        assert!(bare.fields.is_empty());
        assert_eq!(bare.to_string(), "geo.place_id");

        assert!("=url".parse::<ExpansionEntry>().is_err());
    }

    #[test]
    fn test_merge_requires_same_entity() {
        let mut base = SelectionConfig::new(EntityType::Tweet);
        let mut extra = SelectionConfig::new(EntityType::Tweet);
        extra.fields.push("lang".into());
        extra.parameters.push(("max_results".into(), "5".into()));
        base.merge(extra).unwrap();
        assert_eq!(base.fields, ["lang"]);

        let err = base.merge(SelectionConfig::new(EntityType::User)).unwrap_err();
        assert!(err.to_string().contains("cannot merge"));
    }

    #[test]
    fn test_parameters_keep_document_order() {
        let config = SelectionConfig::from_json_str(
            r#"{"entity": "tweet", "parameters": {"max_results": "10", "ids": "1"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.parameters,
            [
                ("max_results".to_string(), "10".to_string()),
                ("ids".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(
            config.compose().unwrap().to_string(),
            "max_results=10&ids=1"
        );

        let json = config.to_json_string().unwrap();
        assert!(json.find("max_results").unwrap() < json.find("\"ids\"").unwrap());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        std::fs::write(&path, USER_SELECTION).unwrap();
        assert_eq!(SelectionConfig::from_path(&path).unwrap().entity, EntityType::User);

        let err = SelectionConfig::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, QueryError::Io(_)));
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = SelectionConfig::from_json_str(USER_SELECTION).unwrap();
        let json = config.to_json_string().unwrap();
        assert_eq!(SelectionConfig::from_json_str(&json).unwrap(), config);
    }
}
