//! Poll entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::parameter::QueryParameter;
use crate::schema::{Entity, EntityType, Expansion, field_catalogue, relation_catalogue};

field_catalogue! {
    /// Optional fields of [`Poll`], requested through `poll.fields`.
    pub enum PollField in Poll {
        DurationMinutes => "duration_minutes",
        EndDatetime => "end_datetime",
        VotingStatus => "voting_status",
    }
}

relation_catalogue! {
    pub enum PollRelation in Poll {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollExpansion {}

impl Expansion for PollExpansion {
    type Relation = PollRelation;

    fn relation(&self) -> PollRelation {
        match *self {}
    }

    fn nested_parameter(&self) -> Option<QueryParameter> {
        match *self {}
    }

    fn bare(relation: PollRelation) -> Self {
        match relation {}
    }

    fn from_parts<S: AsRef<str>>(relation: PollRelation, _nested: &[S]) -> QueryResult<Self> {
        match relation {}
    }
}

/// Poll object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// Poll ID
    pub id: String,

    /// Poll options
    pub options: Vec<PollOption>,

    #[serde(default)]
    pub duration_minutes: Option<u32>,

    #[serde(default)]
    pub end_datetime: Option<DateTime<Utc>>,

    /// "open" or "closed"
    #[serde(default)]
    pub voting_status: Option<String>,
}

impl Poll {
    /// Sum of votes across all options.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes).sum()
    }
}

impl Entity for Poll {
    const TYPE: EntityType = EntityType::Poll;
    type Field = PollField;
    type Expansion = PollExpansion;
}

/// Poll option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// 1-based option position
    pub position: u32,

    pub label: String,

    pub votes: u64,
}
