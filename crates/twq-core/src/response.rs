//! Response envelope types for decoding API payloads.
//!
//! The composer never reads these; they are offered to whatever transport
//! performs the request so that expanded objects can be resolved back to the
//! IDs that referenced them.

use serde::{Deserialize, Serialize};

use crate::entities::{Media, Place, Poll, Tweet, User};
use crate::schema::EntityType;

// ─────────────────────────────────────────────────────────────────────────────
// Core Response Wrapper
// ─────────────────────────────────────────────────────────────────────────────

/// Standard v2 response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// The primary data
    #[serde(default)]
    pub data: Option<T>,

    /// Objects pulled in through `expansions`
    #[serde(default)]
    pub includes: Option<Includes>,

    /// Metadata about the response
    #[serde(default)]
    pub meta: Option<ResponseMeta>,

    /// Errors (partial failures)
    #[serde(default)]
    pub errors: Option<Vec<ApiProblem>>,
}

impl<T> ApiResponse<T> {
    /// `includes`, or an empty envelope when the response carried none.
    #[must_use]
    pub fn includes(&self) -> &Includes {
        static EMPTY: Includes = Includes::EMPTY;
        self.includes.as_ref().unwrap_or(&EMPTY)
    }

    /// Partial-failure problems, if any.
    #[must_use]
    pub fn problems(&self) -> &[ApiProblem] {
        self.errors.as_deref().unwrap_or_default()
    }
}

/// Side-channel container for expanded objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub tweets: Vec<Tweet>,

    #[serde(default)]
    pub media: Vec<Media>,

    #[serde(default)]
    pub places: Vec<Place>,

    #[serde(default)]
    pub polls: Vec<Poll>,
}

impl Includes {
    const EMPTY: Self = Self {
        users: Vec::new(),
        tweets: Vec::new(),
        media: Vec::new(),
        places: Vec::new(),
        polls: Vec::new(),
    };

    #[must_use]
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Look up a user by handle, as referenced by `entities.mentions.username`.
    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }

    #[must_use]
    pub fn tweet(&self, id: &str) -> Option<&Tweet> {
        self.tweets.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn media(&self, media_key: &str) -> Option<&Media> {
        self.media.iter().find(|m| m.media_key == media_key)
    }

    #[must_use]
    pub fn place(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn poll(&self, id: &str) -> Option<&Poll> {
        self.polls.iter().find(|p| p.id == id)
    }

    /// Number of objects in the slot for `entity`.
    #[must_use]
    pub fn count(&self, entity: EntityType) -> usize {
        match entity {
            EntityType::User => self.users.len(),
            EntityType::Tweet => self.tweets.len(),
            EntityType::Media => self.media.len(),
            EntityType::Poll => self.polls.len(),
            EntityType::Place => self.places.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        EntityType::ALL.iter().all(|e| self.count(*e) == 0)
    }
}

/// Response metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub result_count: Option<u32>,

    /// Token for next page
    #[serde(default)]
    pub next_token: Option<String>,

    /// Token for previous page
    #[serde(default)]
    pub previous_token: Option<String>,

    #[serde(default)]
    pub newest_id: Option<String>,

    #[serde(default)]
    pub oldest_id: Option<String>,
}

/// Problem object reported alongside (or instead of) `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub detail: Option<String>,

    /// Problem type URI
    #[serde(default, rename = "type")]
    pub problem_type: Option<String>,

    /// Resource type (e.g., "tweet", "user")
    #[serde(default)]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub resource_id: Option<String>,

    /// Request parameter that caused the problem
    #[serde(default)]
    pub parameter: Option<String>,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub section: Option<String>,
}

impl ApiProblem {
    /// Entity type named by `resource_type`, when it is one we model.
    #[must_use]
    pub fn entity(&self) -> Option<EntityType> {
        self.resource_type.as_deref()?.parse().ok()
    }
}
