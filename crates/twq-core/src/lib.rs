//! twq core - typed field selection and expansion for the Twitter API v2
//!
//! Every entity type (`user`, `tweet`, `media`, `poll`, `place`) has a closed
//! catalogue of optional fields and of relations it can expand. Callers pick
//! a subset of each and the composer turns the choice into the exact query
//! parameters the API expects:
//!
//! - `<entity>.fields` for the root entity's optional fields
//! - `expansions` for the relations to follow
//! - one `<target>.fields` per expanded target type with a nested selection
//!
//! Transport, authentication and pagination are left to the caller; the
//! output is a list of `(name, value)` pairs. The [`response`] types decode
//! what comes back, including the `includes` envelope.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod compose;
mod config;
mod entities;
mod error;
mod expansions;
mod fields;
mod parameter;
pub mod response;
mod schema;

pub use compose::{QueryComposer, build};
pub use config::{ExpansionEntry, SelectionConfig};
pub use entities::*;
pub use error::{QueryError, QueryResult, TokenKind};
pub use expansions::ExpansionSelector;
pub use fields::FieldSelector;
pub use parameter::{QueryParameter, QueryParameters};
pub use response::{ApiProblem, ApiResponse, Includes, ResponseMeta};
pub use schema::{
    EXPANSIONS_PARAMETER, Entity, EntityType, Expansion, Field, Relation, RelationDescriptor,
};
