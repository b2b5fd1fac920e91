//! Entity schema: closed catalogues of optional fields and expansion relations.
//!
//! Each entity type declares its catalogues once through `field_catalogue!`
//! and `relation_catalogue!`. The macros generate plain enums whose
//! declaration order is the canonical serialization order, so typed
//! construction is checked by the compiler and textual construction goes
//! through an exhaustive match that rejects unknown tokens.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{
    MediaField, MediaRelation, PlaceField, PlaceRelation, PollField, PollRelation, TweetField,
    TweetRelation, UserField, UserRelation,
};
use crate::error::{QueryError, QueryResult};
use crate::parameter::QueryParameter;

/// Wire name of the relation parameter shared by every entity type.
pub const EXPANSIONS_PARAMETER: &str = "expansions";

// ─────────────────────────────────────────────────────────────────────────────
// Entity registry
// ─────────────────────────────────────────────────────────────────────────────

/// Resource kinds exposed by the API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Tweet,
    Media,
    Poll,
    Place,
}

impl EntityType {
    /// Every entity type, in registry order.
    pub const ALL: [Self; 5] = [Self::User, Self::Tweet, Self::Media, Self::Poll, Self::Place];

    /// Lowercase entity name (`user`, `tweet`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Tweet => "tweet",
            Self::Media => "media",
            Self::Poll => "poll",
            Self::Place => "place",
        }
    }

    /// Wire name of this type's optional-field parameter.
    #[must_use]
    pub const fn fields_parameter(self) -> &'static str {
        match self {
            Self::User => "user.fields",
            Self::Tweet => "tweet.fields",
            Self::Media => "media.fields",
            Self::Poll => "poll.fields",
            Self::Place => "place.fields",
        }
    }

    /// Key under which expanded objects of this type appear in `includes`.
    #[must_use]
    pub const fn includes_key(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Tweet => "tweets",
            Self::Media => "media",
            Self::Poll => "polls",
            Self::Place => "places",
        }
    }

    /// Optional-field tokens in catalogue order.
    #[must_use]
    pub const fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::User => UserField::NAMES,
            Self::Tweet => TweetField::NAMES,
            Self::Media => MediaField::NAMES,
            Self::Poll => PollField::NAMES,
            Self::Place => PlaceField::NAMES,
        }
    }

    /// Expansion relations in catalogue order.
    #[must_use]
    pub const fn relations(self) -> &'static [RelationDescriptor] {
        match self {
            Self::User => UserRelation::DESCRIPTORS,
            Self::Tweet => TweetRelation::DESCRIPTORS,
            Self::Media => MediaRelation::DESCRIPTORS,
            Self::Poll => PollRelation::DESCRIPTORS,
            Self::Place => PlaceRelation::DESCRIPTORS,
        }
    }

    /// Position of `token` in the optional-field catalogue.
    #[must_use]
    pub fn field_rank(self, token: &str) -> Option<usize> {
        self.field_names().iter().position(|name| *name == token)
    }

    /// Position of `token` in the relation catalogue.
    #[must_use]
    pub fn relation_rank(self, token: &str) -> Option<usize> {
        self.relations().iter().position(|rel| rel.token == token)
    }

    /// Relation descriptor for `token`, if this type declares it.
    #[must_use]
    pub fn relation(self, token: &str) -> Option<&'static RelationDescriptor> {
        self.relations().iter().find(|rel| rel.token == token)
    }

    /// Reverse lookup from a field-parameter name (`tweet.fields` → `Tweet`).
    #[must_use]
    pub fn from_fields_parameter(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.fields_parameter() == name)
    }

    /// Validate a single optional-field token against this catalogue.
    pub fn check_field(self, token: &str) -> QueryResult<()> {
        self.field_rank(token)
            .map(|_| ())
            .ok_or_else(|| QueryError::unknown_field(self, token))
    }

    /// Validate a single relation token against this catalogue.
    pub fn check_relation(self, token: &str) -> QueryResult<()> {
        self.relation_rank(token)
            .map(|_| ())
            .ok_or_else(|| QueryError::unknown_expansion(self, token))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.name() == s)
            .ok_or_else(|| QueryError::Config(format!("unknown entity type `{s}`")))
    }
}

/// Static description of one expansion relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RelationDescriptor {
    /// Wire token listed in `expansions`.
    pub token: &'static str,
    /// Entity type declaring the relation.
    pub source: EntityType,
    /// Entity type pulled into `includes`.
    pub target: EntityType,
    /// Whether a nested `<target>.fields` selection may ride along.
    pub accepts_fields: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalogue traits
// ─────────────────────────────────────────────────────────────────────────────

/// One optional-field token of a closed catalogue.
///
/// `Ord` follows declaration order, which is the canonical order used when
/// serializing a selection.
pub trait Field: Copy + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Entity type owning this catalogue.
    const ENTITY: EntityType;
    /// Every token, in catalogue order.
    const CATALOGUE: &'static [Self];

    /// Wire token.
    fn as_str(self) -> &'static str;

    /// Wire name of the parameter carrying this catalogue.
    fn parameter_name() -> &'static str {
        Self::ENTITY.fields_parameter()
    }

    /// Textual lookup; unknown tokens are a schema violation.
    fn lookup(token: &str) -> QueryResult<Self> {
        Self::CATALOGUE
            .iter()
            .copied()
            .find(|field| field.as_str() == token)
            .ok_or_else(|| QueryError::unknown_field(Self::ENTITY, token))
    }
}

/// One expansion relation of a closed catalogue.
pub trait Relation: Copy + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Entity type declaring the relation.
    const ENTITY: EntityType;
    /// Every relation, in catalogue order.
    const CATALOGUE: &'static [Self];

    /// Wire token.
    fn as_str(self) -> &'static str;

    /// Entity type reached through this relation.
    fn target(self) -> EntityType;

    /// Static descriptor.
    fn descriptor(self) -> RelationDescriptor {
        RelationDescriptor {
            token: self.as_str(),
            source: Self::ENTITY,
            target: self.target(),
            accepts_fields: true,
        }
    }

    /// Textual lookup; unknown tokens are a schema violation.
    fn lookup(token: &str) -> QueryResult<Self> {
        Self::CATALOGUE
            .iter()
            .copied()
            .find(|relation| relation.as_str() == token)
            .ok_or_else(|| QueryError::unknown_expansion(Self::ENTITY, token))
    }
}

/// A chosen relation, optionally carrying a typed field selection for its
/// target entity.
pub trait Expansion: Clone + fmt::Debug + PartialEq + Eq + Send + Sync + 'static {
    /// Relation catalogue this expansion draws from.
    type Relation: Relation;

    /// Relation being expanded.
    fn relation(&self) -> Self::Relation;

    /// Nested `<target>.fields` parameter, `None` when nothing is selected.
    fn nested_parameter(&self) -> Option<QueryParameter>;

    /// Expansion of `relation` with no nested field selection.
    fn bare(relation: Self::Relation) -> Self;

    /// Build from textual nested field tokens, validated against the target
    /// catalogue.
    fn from_parts<S: AsRef<str>>(relation: Self::Relation, nested: &[S]) -> QueryResult<Self>;
}

/// An entity type with typed catalogues.
pub trait Entity: 'static {
    /// Registry entry.
    const TYPE: EntityType;
    /// Optional-field catalogue.
    type Field: Field;
    /// Expansion values, keyed by the relation catalogue.
    type Expansion: Expansion;
}

// ─────────────────────────────────────────────────────────────────────────────
// Declaration macros
// ─────────────────────────────────────────────────────────────────────────────

/// Declare an optional-field catalogue for one entity type.
macro_rules! field_catalogue {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $entity:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Wire tokens in catalogue order.
            pub const NAMES: &'static [&'static str] = &[$($token),+];
        }

        impl $crate::schema::Field for $name {
            const ENTITY: $crate::schema::EntityType = $crate::schema::EntityType::$entity;
            const CATALOGUE: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::QueryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::schema::Field>::lookup(s)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::schema::Field::as_str(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::schema::Field::as_str(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                token.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Declare the expansion-relation catalogue for one entity type.
macro_rules! relation_catalogue {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $entity:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal -> $target:ident, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            /// Static descriptors in catalogue order.
            pub const DESCRIPTORS: &'static [$crate::schema::RelationDescriptor] = &[
                $($crate::schema::RelationDescriptor {
                    token: $token,
                    source: $crate::schema::EntityType::$entity,
                    target: $crate::schema::EntityType::$target,
                    accepts_fields: true,
                },)*
            ];
        }

        impl $crate::schema::Relation for $name {
            const ENTITY: $crate::schema::EntityType = $crate::schema::EntityType::$entity;
            const CATALOGUE: &'static [Self] = &[$(Self::$variant),*];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)*
                }
            }

            fn target(self) -> $crate::schema::EntityType {
                match self {
                    $(Self::$variant => $crate::schema::EntityType::$target,)*
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::QueryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::schema::Relation>::lookup(s)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::schema::Relation::as_str(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::schema::Relation::as_str(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                token.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use field_catalogue;
pub(crate) use relation_catalogue;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_fields_parameter_round_trip() {
        for entity in EntityType::ALL {
            assert_eq!(
                EntityType::from_fields_parameter(entity.fields_parameter()),
                Some(entity)
            );
        }
        assert_eq!(EntityType::from_fields_parameter("expansions"), None);
        assert_eq!(EntityType::from_fields_parameter("users.fields"), None);
    }

    #[test]
    fn test_catalogue_tokens_unique_and_snake_case() {
        for entity in EntityType::ALL {
            let names = entity.field_names();
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len(), "duplicate token in {entity}");
            for name in names {
                assert!(
                    name.chars()
                        .all(|c| c.is_ascii_lowercase() || c == '_' || c.is_ascii_digit()),
                    "{name} is not snake_case"
                );
            }
        }
    }

    #[test]
    fn test_relation_descriptors_declare_source() {
        for entity in EntityType::ALL {
            for rel in entity.relations() {
                assert_eq!(rel.source, entity);
                assert!(rel.accepts_fields);
            }
        }
        assert!(EntityType::Media.relations().is_empty());
        assert!(EntityType::Poll.relations().is_empty());
        assert!(EntityType::Place.relations().is_empty());
    }

    #[test]
    fn test_user_relation_targets_tweet() {
        let rel = EntityType::User
            .relation("pinned_tweet_id")
            .expect("pinned_tweet_id should exist");
        assert_eq!(rel.target, EntityType::Tweet);
        assert_eq!(UserRelation::PinnedTweetId.descriptor(), *rel);
    }

    #[test]
    fn test_ranks_follow_catalogue_order() {
        assert_eq!(EntityType::User.field_rank("created_at"), Some(0));
        assert_eq!(EntityType::User.field_rank("withheld"), Some(10));
        assert_eq!(EntityType::User.field_rank("username"), None);
        assert_eq!(EntityType::Tweet.relation_rank("attachments.poll_ids"), Some(0));
        assert_eq!(EntityType::Tweet.relation_rank("pinned_tweet_id"), None);
    }

    #[test]
    fn test_typed_lookup_matches_registry() {
        for field in UserField::CATALOGUE {
            assert_eq!(UserField::lookup(field.as_str()).unwrap(), *field);
            assert!(EntityType::User.check_field(field.as_str()).is_ok());
        }
        let err = TweetField::lookup("description").unwrap_err();
        assert!(err.is_schema_violation());
        let err = EntityType::Poll.check_relation("author_id").unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn test_entity_type_parsing() {
        assert_eq!("tweet".parse::<EntityType>().unwrap(), EntityType::Tweet);
        assert!("tweets".parse::<EntityType>().is_err());
        assert_eq!(EntityType::Place.to_string(), "place");
        assert_eq!(
            serde_json::to_value(EntityType::Media).unwrap(),
            serde_json::json!("media")
        );
    }

    #[test]
    fn test_generated_serde_uses_wire_tokens() {
        let json = serde_json::to_value(TweetRelation::ReferencedTweetsIdAuthorId).unwrap();
        assert_eq!(json, serde_json::json!("referenced_tweets.id.author_id"));

        let field: UserField = serde_json::from_value(serde_json::json!("public_metrics")).unwrap();
        assert_eq!(field, UserField::PublicMetrics);

        let err = serde_json::from_value::<UserField>(serde_json::json!("nope")).unwrap_err();
        assert!(err.to_string().contains("unknown field `nope`"));
    }
}
