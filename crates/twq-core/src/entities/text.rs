//! Payload pieces shared by several entity types.

use serde::{Deserialize, Serialize};

/// URL found in a text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    /// Start position in text
    pub start: u32,

    /// End position in text
    pub end: u32,

    /// Original (shortened) URL
    #[serde(default)]
    pub url: Option<String>,

    /// Expanded URL
    #[serde(default)]
    pub expanded_url: Option<String>,

    /// Display URL
    #[serde(default)]
    pub display_url: Option<String>,
}

/// Hashtag or cashtag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntity {
    pub start: u32,
    pub end: u32,
    /// Tag text without the leading `#` or `$`
    pub tag: String,
}

/// `@username` mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEntity {
    pub start: u32,
    pub end: u32,
    pub username: String,

    /// Mentioned user ID
    #[serde(default)]
    pub id: Option<String>,
}

/// Withholding details for withheld content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withheld {
    /// Withheld due to a copyright complaint
    #[serde(default)]
    pub copyright: Option<bool>,

    /// Countries where the content is withheld
    #[serde(default)]
    pub country_codes: Vec<String>,

    /// Whether a whole account or a single tweet is withheld
    #[serde(default)]
    pub scope: Option<String>,
}
