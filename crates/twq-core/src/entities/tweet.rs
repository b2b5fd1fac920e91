//! Tweet entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::{Media, MediaField};
use super::place::{Place, PlaceField};
use super::poll::{Poll, PollField};
use super::text::{MentionEntity, TagEntity, UrlEntity, Withheld};
use super::user::{User, UserField};
use crate::error::QueryResult;
use crate::fields::FieldSelector;
use crate::parameter::QueryParameter;
use crate::response::Includes;
use crate::schema::{Entity, EntityType, Expansion, field_catalogue, relation_catalogue};

field_catalogue! {
    /// Optional fields of [`Tweet`], requested through `tweet.fields`.
    pub enum TweetField in Tweet {
        Attachments => "attachments",
        AuthorId => "author_id",
        ContextAnnotations => "context_annotations",
        ConversationId => "conversation_id",
        CreatedAt => "created_at",
        Entities => "entities",
        Geo => "geo",
        InReplyToUserId => "in_reply_to_user_id",
        Lang => "lang",
        /// Requires user-context authentication.
        NonPublicMetrics => "non_public_metrics",
        /// Requires user-context authentication.
        OrganicMetrics => "organic_metrics",
        PossiblySensitive => "possibly_sensitive",
        /// Requires user-context authentication.
        PromotedMetrics => "promoted_metrics",
        PublicMetrics => "public_metrics",
        ReferencedTweets => "referenced_tweets",
        ReplySettings => "reply_settings",
        Source => "source",
        Withheld => "withheld",
    }
}

relation_catalogue! {
    /// Relations a [`Tweet`] can expand.
    pub enum TweetRelation in Tweet {
        AttachmentsPollIds => "attachments.poll_ids" -> Poll,
        AttachmentsMediaKeys => "attachments.media_keys" -> Media,
        AuthorId => "author_id" -> User,
        EntitiesMentionsUsername => "entities.mentions.username" -> User,
        GeoPlaceId => "geo.place_id" -> Place,
        InReplyToUserId => "in_reply_to_user_id" -> User,
        ReferencedTweetsId => "referenced_tweets.id" -> Tweet,
        ReferencedTweetsIdAuthorId => "referenced_tweets.id.author_id" -> User,
    }
}

/// An expansion of a [`Tweet`], carrying the target's field selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetExpansion {
    AttachmentsPollIds(FieldSelector<PollField>),
    AttachmentsMediaKeys(FieldSelector<MediaField>),
    AuthorId(FieldSelector<UserField>),
    EntitiesMentionsUsername(FieldSelector<UserField>),
    GeoPlaceId(FieldSelector<PlaceField>),
    InReplyToUserId(FieldSelector<UserField>),
    /// Quoted, retweeted or replied-to tweets; shares `tweet.fields` with the
    /// root selection.
    ReferencedTweetsId(FieldSelector<TweetField>),
    ReferencedTweetsIdAuthorId(FieldSelector<UserField>),
}

impl Expansion for TweetExpansion {
    type Relation = TweetRelation;

    fn relation(&self) -> TweetRelation {
        match self {
            Self::AttachmentsPollIds(_) => TweetRelation::AttachmentsPollIds,
            Self::AttachmentsMediaKeys(_) => TweetRelation::AttachmentsMediaKeys,
            Self::AuthorId(_) => TweetRelation::AuthorId,
            Self::EntitiesMentionsUsername(_) => TweetRelation::EntitiesMentionsUsername,
            Self::GeoPlaceId(_) => TweetRelation::GeoPlaceId,
            Self::InReplyToUserId(_) => TweetRelation::InReplyToUserId,
            Self::ReferencedTweetsId(_) => TweetRelation::ReferencedTweetsId,
            Self::ReferencedTweetsIdAuthorId(_) => TweetRelation::ReferencedTweetsIdAuthorId,
        }
    }

    fn nested_parameter(&self) -> Option<QueryParameter> {
        match self {
            Self::AttachmentsPollIds(fields) => fields.to_query_parameter(),
            Self::AttachmentsMediaKeys(fields) => fields.to_query_parameter(),
            Self::GeoPlaceId(fields) => fields.to_query_parameter(),
            Self::ReferencedTweetsId(fields) => fields.to_query_parameter(),
            Self::AuthorId(fields)
            | Self::EntitiesMentionsUsername(fields)
            | Self::InReplyToUserId(fields)
            | Self::ReferencedTweetsIdAuthorId(fields) => fields.to_query_parameter(),
        }
    }

    fn bare(relation: TweetRelation) -> Self {
        match relation {
            TweetRelation::AttachmentsPollIds => Self::AttachmentsPollIds(FieldSelector::empty()),
            TweetRelation::AttachmentsMediaKeys => {
                Self::AttachmentsMediaKeys(FieldSelector::empty())
            }
            TweetRelation::AuthorId => Self::AuthorId(FieldSelector::empty()),
            TweetRelation::EntitiesMentionsUsername => {
                Self::EntitiesMentionsUsername(FieldSelector::empty())
            }
            TweetRelation::GeoPlaceId => Self::GeoPlaceId(FieldSelector::empty()),
            TweetRelation::InReplyToUserId => Self::InReplyToUserId(FieldSelector::empty()),
            TweetRelation::ReferencedTweetsId => Self::ReferencedTweetsId(FieldSelector::empty()),
            TweetRelation::ReferencedTweetsIdAuthorId => {
                Self::ReferencedTweetsIdAuthorId(FieldSelector::empty())
            }
        }
    }

    fn from_parts<S: AsRef<str>>(relation: TweetRelation, nested: &[S]) -> QueryResult<Self> {
        Ok(match relation {
            TweetRelation::AttachmentsPollIds => {
                Self::AttachmentsPollIds(FieldSelector::parse(nested)?)
            }
            TweetRelation::AttachmentsMediaKeys => {
                Self::AttachmentsMediaKeys(FieldSelector::parse(nested)?)
            }
            TweetRelation::AuthorId => Self::AuthorId(FieldSelector::parse(nested)?),
            TweetRelation::EntitiesMentionsUsername => {
                Self::EntitiesMentionsUsername(FieldSelector::parse(nested)?)
            }
            TweetRelation::GeoPlaceId => Self::GeoPlaceId(FieldSelector::parse(nested)?),
            TweetRelation::InReplyToUserId => Self::InReplyToUserId(FieldSelector::parse(nested)?),
            TweetRelation::ReferencedTweetsId => {
                Self::ReferencedTweetsId(FieldSelector::parse(nested)?)
            }
            TweetRelation::ReferencedTweetsIdAuthorId => {
                Self::ReferencedTweetsIdAuthorId(FieldSelector::parse(nested)?)
            }
        })
    }
}

impl From<TweetRelation> for TweetExpansion {
    fn from(relation: TweetRelation) -> Self {
        Self::bare(relation)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload
// ─────────────────────────────────────────────────────────────────────────────

/// Twitter tweet object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    /// Tweet ID
    pub id: String,

    /// Tweet text content
    pub text: String,

    /// Edit history tweet IDs, oldest first
    #[serde(default)]
    pub edit_history_tweet_ids: Vec<String>,

    /// Attached media keys and poll IDs
    #[serde(default)]
    pub attachments: Option<Attachments>,

    /// Author user ID
    #[serde(default)]
    pub author_id: Option<String>,

    #[serde(default)]
    pub context_annotations: Option<Vec<ContextAnnotation>>,

    /// ID of the tweet that started the thread
    #[serde(default)]
    pub conversation_id: Option<String>,

    /// Tweet creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Entities (mentions, hashtags, URLs, etc.)
    #[serde(default)]
    pub entities: Option<TweetEntities>,

    #[serde(default)]
    pub geo: Option<TweetGeo>,

    /// Author of the tweet this one replies to
    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,

    /// Language of the tweet (BCP47)
    #[serde(default)]
    pub lang: Option<String>,

    #[serde(default)]
    pub non_public_metrics: Option<TweetEngagementMetrics>,

    #[serde(default)]
    pub organic_metrics: Option<TweetEngagementMetrics>,

    /// Whether the tweet may contain sensitive content
    #[serde(default)]
    pub possibly_sensitive: Option<bool>,

    #[serde(default)]
    pub promoted_metrics: Option<TweetEngagementMetrics>,

    /// Public engagement metrics
    #[serde(default)]
    pub public_metrics: Option<TweetPublicMetrics>,

    /// Referenced tweets (replies, quotes, retweets)
    #[serde(default)]
    pub referenced_tweets: Option<Vec<ReferencedTweet>>,

    /// Who may reply: "everyone", "mentionedUsers", "following"
    #[serde(default)]
    pub reply_settings: Option<String>,

    /// Source application
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub withheld: Option<Withheld>,
}

impl Tweet {
    /// Author, when `author_id` was expanded.
    #[must_use]
    pub fn author<'a>(&self, includes: &'a Includes) -> Option<&'a User> {
        includes.user(self.author_id.as_deref()?)
    }

    /// Attached media present in `includes`, in attachment order.
    #[must_use]
    pub fn media<'a>(&self, includes: &'a Includes) -> Vec<&'a Media> {
        self.attachments
            .iter()
            .flat_map(|a| a.media_keys.iter().flatten())
            .filter_map(|key| includes.media(key))
            .collect()
    }

    /// Attached poll, when `attachments.poll_ids` was expanded.
    #[must_use]
    pub fn poll<'a>(&self, includes: &'a Includes) -> Option<&'a Poll> {
        self.attachments
            .as_ref()?
            .poll_ids
            .iter()
            .flatten()
            .find_map(|id| includes.poll(id))
    }

    /// Tagged place, when `geo.place_id` was expanded.
    #[must_use]
    pub fn place<'a>(&self, includes: &'a Includes) -> Option<&'a Place> {
        includes.place(self.geo.as_ref()?.place_id.as_deref()?)
    }

    /// Referenced tweets present in `includes`, paired with the reference type.
    #[must_use]
    pub fn referenced<'a>(&self, includes: &'a Includes) -> Vec<(&str, &'a Tweet)> {
        self.referenced_tweets
            .iter()
            .flatten()
            .filter_map(|r| Some((r.ref_type.as_str(), includes.tweet(&r.id)?)))
            .collect()
    }
}

impl Entity for Tweet {
    const TYPE: EntityType = EntityType::Tweet;
    type Field = TweetField;
    type Expansion = TweetExpansion;
}

/// Referenced tweet (retweet, quote, reply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedTweet {
    /// Reference type: "retweeted", "quoted", "replied_to"
    #[serde(rename = "type")]
    pub ref_type: String,

    /// Referenced tweet ID
    pub id: String,
}

/// Tweet attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Option<Vec<String>>,

    #[serde(default)]
    pub poll_ids: Option<Vec<String>>,
}

/// Tweet public metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetPublicMetrics {
    pub retweet_count: u64,
    pub reply_count: u64,
    pub like_count: u64,
    pub quote_count: u64,

    #[serde(default)]
    pub bookmark_count: Option<u64>,

    #[serde(default)]
    pub impression_count: Option<u64>,
}

/// Private, organic or promoted engagement counters.
///
/// The three metric groups share one shape; each counter is only present in
/// the groups that report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetEngagementMetrics {
    #[serde(default)]
    pub impression_count: Option<u64>,

    #[serde(default)]
    pub like_count: Option<u64>,

    #[serde(default)]
    pub reply_count: Option<u64>,

    #[serde(default)]
    pub retweet_count: Option<u64>,

    #[serde(default)]
    pub url_link_clicks: Option<u64>,

    #[serde(default)]
    pub user_profile_clicks: Option<u64>,
}

/// Context annotation: a (domain, entity) pair inferred from the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextAnnotation {
    pub domain: ContextAnnotationItem,
    pub entity: ContextAnnotationItem,
}

/// Domain or entity half of a [`ContextAnnotation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextAnnotationItem {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Entities parsed out of the tweet text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetEntities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,

    #[serde(default)]
    pub hashtags: Vec<TagEntity>,

    #[serde(default)]
    pub mentions: Vec<MentionEntity>,

    #[serde(default)]
    pub cashtags: Vec<TagEntity>,
}

/// Location tagged on a tweet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetGeo {
    /// Place ID, resolvable through `geo.place_id`
    #[serde(default)]
    pub place_id: Option<String>,

    /// Exact point, when the author shared one
    #[serde(default)]
    pub coordinates: Option<serde_json::Value>,
}
