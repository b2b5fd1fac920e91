//! Entity types of the API: catalogues, typed expansions and payload shapes.

mod media;
mod place;
mod poll;
mod text;
mod tweet;
mod user;

pub use media::{
    Media, MediaEngagementMetrics, MediaExpansion, MediaField, MediaPublicMetrics, MediaRelation,
};
pub use place::{Place, PlaceExpansion, PlaceField, PlaceGeo, PlaceRelation};
pub use poll::{Poll, PollExpansion, PollField, PollOption, PollRelation};
pub use text::{MentionEntity, TagEntity, UrlEntity, Withheld};
pub use tweet::{
    Attachments, ContextAnnotation, ContextAnnotationItem, ReferencedTweet, Tweet,
    TweetEngagementMetrics, TweetEntities, TweetExpansion, TweetField, TweetGeo,
    TweetPublicMetrics, TweetRelation,
};
pub use user::{
    DescriptionEntities, UrlEntities, User, UserEntities, UserExpansion, UserField,
    UserPublicMetrics, UserRelation,
};
