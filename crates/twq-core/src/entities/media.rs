//! Media entity. Media objects expand nothing further.

use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::parameter::QueryParameter;
use crate::schema::{Entity, EntityType, Expansion, field_catalogue, relation_catalogue};

field_catalogue! {
    /// Optional fields of [`Media`], requested through `media.fields`.
    pub enum MediaField in Media {
        AltText => "alt_text",
        DurationMs => "duration_ms",
        Height => "height",
        NonPublicMetrics => "non_public_metrics",
        OrganicMetrics => "organic_metrics",
        PreviewImageUrl => "preview_image_url",
        PromotedMetrics => "promoted_metrics",
        PublicMetrics => "public_metrics",
        Url => "url",
        Width => "width",
    }
}

relation_catalogue! {
    /// Media declares no relations.
    pub enum MediaRelation in Media {}
}

/// Uninhabited: there is nothing to expand from a media object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaExpansion {}

impl Expansion for MediaExpansion {
    type Relation = MediaRelation;

    fn relation(&self) -> MediaRelation {
        match *self {}
    }

    fn nested_parameter(&self) -> Option<QueryParameter> {
        match *self {}
    }

    fn bare(relation: MediaRelation) -> Self {
        match relation {}
    }

    fn from_parts<S: AsRef<str>>(relation: MediaRelation, _nested: &[S]) -> QueryResult<Self> {
        match relation {}
    }
}

/// Media object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Media key, referenced from `attachments.media_keys`
    pub media_key: String,

    /// Media type: "photo", "video", "animated_gif"
    #[serde(rename = "type")]
    pub media_type: String,

    #[serde(default)]
    pub alt_text: Option<String>,

    /// Duration in milliseconds (for video)
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub non_public_metrics: Option<MediaEngagementMetrics>,

    #[serde(default)]
    pub organic_metrics: Option<MediaEngagementMetrics>,

    #[serde(default)]
    pub preview_image_url: Option<String>,

    #[serde(default)]
    pub promoted_metrics: Option<MediaEngagementMetrics>,

    #[serde(default)]
    pub public_metrics: Option<MediaPublicMetrics>,

    /// URL (for photos)
    #[serde(default)]
    pub url: Option<String>,

    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,
}

impl Entity for Media {
    const TYPE: EntityType = EntityType::Media;
    type Field = MediaField;
    type Expansion = MediaExpansion;
}

/// Media public metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPublicMetrics {
    /// View count (for video)
    #[serde(default)]
    pub view_count: Option<u64>,
}

/// Video playback quartiles and view counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEngagementMetrics {
    #[serde(default)]
    pub playback_0_count: Option<u64>,
    #[serde(default)]
    pub playback_25_count: Option<u64>,
    #[serde(default)]
    pub playback_50_count: Option<u64>,
    #[serde(default)]
    pub playback_75_count: Option<u64>,
    #[serde(default)]
    pub playback_100_count: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Relation};

    #[test]
    fn test_catalogues() {
        assert_eq!(MediaField::CATALOGUE.len(), 10);
        assert_eq!(MediaField::parameter_name(), "media.fields");
        assert!(MediaRelation::CATALOGUE.is_empty());
        assert!(MediaRelation::lookup("author_id").unwrap_err().is_schema_violation());
    }

    #[test]
    fn test_decode_video() {
        let media: Media = serde_json::from_value(serde_json::json!({
            "media_key": "7_1",
            "type": "video",
            "duration_ms": 46_947,
            "width": 1280,
            "height": 720,
            "public_metrics": {"view_count": 10},
            "organic_metrics": {"playback_0_count": 4, "view_count": 3}
        }))
        .unwrap();

        assert_eq!(media.media_type, "video");
        assert_eq!(media.duration_ms, Some(46_947));
        assert_eq!(media.public_metrics.unwrap().view_count, Some(10));
        assert_eq!(media.organic_metrics.unwrap().playback_0_count, Some(4));
        assert_eq!(media.url, None);
    }
}
