//! Query construction error types.

use std::fmt;

use thiserror::Error;

use crate::schema::EntityType;

/// Which catalogue a rejected token was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Optional-field catalogue (`<entity>.fields`).
    Field,
    /// Expansion-relation catalogue (`expansions`).
    Expansion,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("field"),
            Self::Expansion => f.write_str("expansion"),
        }
    }
}

/// Errors raised while building a query.
///
/// Every variant is produced synchronously at construction time; nothing in
/// this crate performs I/O against the API.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A token is not part of the entity's closed catalogue.
    #[error("unknown {kind} `{token}` for entity `{entity}`")]
    SchemaViolation {
        entity: EntityType,
        kind: TokenKind,
        token: String,
    },

    /// A caller-supplied parameter is malformed.
    #[error("invalid query parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Configuration document is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Unknown optional-field token for `entity`.
    #[must_use]
    pub fn unknown_field(entity: EntityType, token: impl Into<String>) -> Self {
        Self::SchemaViolation {
            entity,
            kind: TokenKind::Field,
            token: token.into(),
        }
    }

    /// Unknown relation token for `entity`.
    #[must_use]
    pub fn unknown_expansion(entity: EntityType, token: impl Into<String>) -> Self {
        Self::SchemaViolation {
            entity,
            kind: TokenKind::Expansion,
            token: token.into(),
        }
    }

    /// Malformed caller parameter.
    #[must_use]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is a catalogue rejection.
    #[must_use]
    pub const fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. })
    }
}

/// Result type for query construction.
pub type QueryResult<T> = Result<T, QueryError>;
