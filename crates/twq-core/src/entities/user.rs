//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::text::{MentionEntity, TagEntity, UrlEntity, Withheld};
use super::tweet::{Tweet, TweetField};
use crate::error::QueryResult;
use crate::fields::FieldSelector;
use crate::parameter::QueryParameter;
use crate::response::Includes;
use crate::schema::{Entity, EntityType, Expansion, field_catalogue, relation_catalogue};

field_catalogue! {
    /// Optional fields of [`User`], requested through `user.fields`.
    pub enum UserField in User {
        CreatedAt => "created_at",
        Description => "description",
        Entities => "entities",
        Location => "location",
        PinnedTweetId => "pinned_tweet_id",
        ProfileImageUrl => "profile_image_url",
        Protected => "protected",
        PublicMetrics => "public_metrics",
        Url => "url",
        Verified => "verified",
        Withheld => "withheld",
    }
}

relation_catalogue! {
    /// Relations a [`User`] can expand.
    pub enum UserRelation in User {
        PinnedTweetId => "pinned_tweet_id" -> Tweet,
    }
}

/// An expansion of a [`User`], carrying the target's field selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserExpansion {
    /// The pinned tweet, delivered in `includes.tweets`.
    PinnedTweetId(FieldSelector<TweetField>),
}

impl Expansion for UserExpansion {
    type Relation = UserRelation;

    fn relation(&self) -> UserRelation {
        match self {
            Self::PinnedTweetId(_) => UserRelation::PinnedTweetId,
        }
    }

    fn nested_parameter(&self) -> Option<QueryParameter> {
        match self {
            Self::PinnedTweetId(fields) => fields.to_query_parameter(),
        }
    }

    fn bare(relation: UserRelation) -> Self {
        match relation {
            UserRelation::PinnedTweetId => Self::PinnedTweetId(FieldSelector::empty()),
        }
    }

    fn from_parts<S: AsRef<str>>(relation: UserRelation, nested: &[S]) -> QueryResult<Self> {
        Ok(match relation {
            UserRelation::PinnedTweetId => Self::PinnedTweetId(FieldSelector::parse(nested)?),
        })
    }
}

impl From<UserRelation> for UserExpansion {
    fn from(relation: UserRelation) -> Self {
        Self::bare(relation)
    }
}

/// Twitter user object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: String,

    /// Display name, as set on the profile
    pub name: String,

    /// Handle without the leading `@`
    pub username: String,

    /// Account creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Whether the account's tweets are private
    #[serde(default)]
    pub protected: Option<bool>,

    /// Withholding details
    #[serde(default)]
    pub withheld: Option<Withheld>,

    /// Free-form profile location
    #[serde(default)]
    pub location: Option<String>,

    /// Pinned tweet ID
    #[serde(default)]
    pub pinned_tweet_id: Option<String>,

    /// Profile URL
    #[serde(default)]
    pub url: Option<String>,

    /// Profile bio
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the account is verified
    #[serde(default)]
    pub verified: Option<bool>,

    /// Entities parsed out of the URL and bio
    #[serde(default)]
    pub entities: Option<UserEntities>,

    /// Profile image URL
    #[serde(default)]
    pub profile_image_url: Option<String>,

    /// Public metrics
    #[serde(default)]
    pub public_metrics: Option<UserPublicMetrics>,
}

impl User {
    /// Resolve the pinned tweet from an `includes` envelope.
    #[must_use]
    pub fn pinned_tweet<'a>(&self, includes: &'a Includes) -> Option<&'a Tweet> {
        includes.tweet(self.pinned_tweet_id.as_deref()?)
    }
}

impl Entity for User {
    const TYPE: EntityType = EntityType::User;
    type Field = UserField;
    type Expansion = UserExpansion;
}

/// User public metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublicMetrics {
    pub followers_count: u64,
    pub following_count: u64,
    pub tweet_count: u64,
    pub listed_count: u64,
}

/// Entities found in the profile URL and bio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntities {
    #[serde(default)]
    pub url: Option<UrlEntities>,

    #[serde(default)]
    pub description: Option<DescriptionEntities>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

/// Entities found in the bio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionEntities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,

    #[serde(default)]
    pub hashtags: Vec<TagEntity>,

    #[serde(default)]
    pub mentions: Vec<MentionEntity>,

    #[serde(default)]
    pub cashtags: Vec<TagEntity>,
}
