//! Query composition: root fields, expansions, nested fields and opaque
//! parameters merged into the final ordered parameter list.

use std::fmt;

use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::expansions::ExpansionSelector;
use crate::fields::FieldSelector;
use crate::parameter::{QueryParameter, QueryParameters};
use crate::schema::{EXPANSIONS_PARAMETER, Entity, EntityType};

/// Compose the parameters for a request rooted at entity type `E`.
///
/// Emission order is the root field parameter, `expansions`, the nested
/// target field parameters, then `others` in caller order. Same-name
/// parameters merge into the first occurrence, so a nested `tweet.fields`
/// under a tweet root lands in the root's slot. Field and relation tokens are
/// re-sorted into catalogue order once everything is merged.
pub fn build<E: Entity>(
    fields: &FieldSelector<E::Field>,
    expansions: &ExpansionSelector<E::Expansion>,
    others: impl IntoIterator<Item = QueryParameter>,
) -> QueryResult<QueryParameters> {
    let mut params = QueryParameters::new();
    if let Some(root) = fields.to_query_parameter() {
        params.insert(root);
    }
    params.append(expansions.to_query_parameters());

    for other in others {
        params.insert(check_parameter(E::TYPE, other)?);
    }
    params.canonicalize(E::TYPE);

    debug!(
        entity = %E::TYPE,
        parameters = params.len(),
        expansions = expansions.len(),
        "composed query parameters"
    );
    Ok(params)
}

/// Validate a caller-supplied parameter.
///
/// Parameters named like a field parameter or `expansions` are re-split on
/// `,` and every token checked against its catalogue; anything else is opaque.
fn check_parameter(root: EntityType, param: QueryParameter) -> QueryResult<QueryParameter> {
    let name = param.name();
    if name.trim().is_empty() {
        return Err(QueryError::invalid_parameter(name, "name must not be empty"));
    }

    if let Some(entity) = EntityType::from_fields_parameter(name) {
        let split = QueryParameter::parse(name, &param.value());
        for token in split.values() {
            entity.check_field(token)?;
        }
        return Ok(split);
    }

    if name == EXPANSIONS_PARAMETER {
        let split = QueryParameter::parse(name, &param.value());
        for token in split.values() {
            root.check_relation(token)?;
        }
        return Ok(split);
    }

    Ok(param)
}

/// Builder over [`build`] for a fixed root entity type.
///
/// ```
/// use twq_core::{QueryComposer, TweetField, User, UserExpansion, UserField};
///
/// let params = QueryComposer::<User>::new()
///     .field(UserField::CreatedAt)
///     .expand(UserExpansion::PinnedTweetId([TweetField::Lang].into()))
///     .parameter("max_results", "10")?
///     .build()?;
///
/// assert_eq!(
///     params.to_string(),
///     "user.fields=created_at&expansions=pinned_tweet_id&tweet.fields=lang&max_results=10"
/// );
/// # Ok::<(), twq_core::QueryError>(())
/// ```
pub struct QueryComposer<E: Entity> {
    fields: FieldSelector<E::Field>,
    expansions: ExpansionSelector<E::Expansion>,
    others: Vec<QueryParameter>,
}

impl<E: Entity> QueryComposer<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: FieldSelector::empty(),
            expansions: ExpansionSelector::empty(),
            others: Vec::new(),
        }
    }

    /// Replace the root field selection.
    #[must_use]
    pub fn fields(mut self, fields: FieldSelector<E::Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Add one root field.
    #[must_use]
    pub fn field(mut self, field: E::Field) -> Self {
        self.fields.insert(field);
        self
    }

    /// Replace the expansion selection.
    #[must_use]
    pub fn expansions(mut self, expansions: ExpansionSelector<E::Expansion>) -> Self {
        self.expansions = expansions;
        self
    }

    /// Add or replace one expansion.
    #[must_use]
    pub fn expand(mut self, expansion: impl Into<E::Expansion>) -> Self {
        self.expansions.insert(expansion.into());
        self
    }

    /// Append an opaque `name=value` parameter. The value is split on `,` and
    /// unioned with any earlier parameter of the same name.
    pub fn parameter(self, name: impl Into<String>, value: impl Into<String>) -> QueryResult<Self> {
        self.raw_parameter(QueryParameter::new(name, [value.into()]))
    }

    /// Append a prepared parameter, validating it against the catalogues.
    pub fn raw_parameter(mut self, param: QueryParameter) -> QueryResult<Self> {
        self.others.push(check_parameter(E::TYPE, param)?);
        Ok(self)
    }

    #[must_use]
    pub const fn field_selector(&self) -> &FieldSelector<E::Field> {
        &self.fields
    }

    #[must_use]
    pub const fn expansion_selector(&self) -> &ExpansionSelector<E::Expansion> {
        &self.expansions
    }

    /// Compose the final parameter list. Does not consume the builder.
    pub fn build(&self) -> QueryResult<QueryParameters> {
        build::<E>(&self.fields, &self.expansions, self.others.iter().cloned())
    }
}

impl<E: Entity> Default for QueryComposer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for QueryComposer<E> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            expansions: self.expansions.clone(),
            others: self.others.clone(),
        }
    }
}

impl<E: Entity> fmt::Debug for QueryComposer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryComposer")
            .field("entity", &E::TYPE)
            .field("fields", &self.fields)
            .field("expansions", &self.expansions)
            .field("others", &self.others)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        MediaField, PlaceField, Tweet, TweetExpansion, TweetField, TweetRelation, User,
        UserExpansion, UserField,
    };

    fn no_params() -> Vec<QueryParameter> {
        Vec::new()
    }

    #[test]
    fn test_empty_build_is_empty() {
        let params = build::<User>(&FieldSelector::empty(), &ExpansionSelector::empty(), no_params())
            .unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_user_round_trip() {
        let fields = FieldSelector::from([UserField::CreatedAt, UserField::Protected]);
        let expansions = ExpansionSelector::empty().add(UserExpansion::PinnedTweetId(
            FieldSelector::from([TweetField::CreatedAt]),
        ));

        let pairs = build::<User>(&fields, &expansions, no_params())
            .unwrap()
            .into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("user.fields".to_string(), "created_at,protected".to_string()),
                ("expansions".to_string(), "pinned_tweet_id".to_string()),
                ("tweet.fields".to_string(), "created_at".to_string()),
            ]
        );
    }

    #[test]
    fn test_root_fields_precede_expansions() {
        let composer = QueryComposer::<Tweet>::new()
            .expand(TweetRelation::AuthorId)
            .field(TweetField::Lang);
        assert_eq!(composer.build().unwrap().names(), ["tweet.fields", "expansions"]);
    }

    #[test]
    fn test_nested_tweet_fields_merge_into_root_slot() {
        let composer = QueryComposer::<Tweet>::new()
            .fields(FieldSelector::from([TweetField::Source, TweetField::AuthorId]))
            .expand(TweetExpansion::ReferencedTweetsId(FieldSelector::from([
                TweetField::CreatedAt,
                TweetField::Source,
            ])))
            .expand(TweetExpansion::AuthorId(FieldSelector::from([UserField::Url])));

        let params = composer.build().unwrap();
        assert_eq!(params.names(), ["tweet.fields", "expansions", "user.fields"]);
        assert_eq!(
            params.value_of("tweet.fields").as_deref(),
            Some("author_id,created_at,source")
        );
        assert_eq!(
            params.value_of("expansions").as_deref(),
            Some("author_id,referenced_tweets.id")
        );
    }

    #[test]
    fn test_others_follow_in_caller_order() {
        let params = QueryComposer::<Tweet>::new()
            .expand(TweetExpansion::AttachmentsMediaKeys(FieldSelector::from([
                MediaField::Url,
            ])))
            .parameter("max_results", "10")
            .unwrap()
            .parameter("ids", "1,2")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            params.to_string(),
            "expansions=attachments.media_keys&media.fields=url&max_results=10&ids=1,2"
        );
    }

    #[test]
    fn test_other_field_parameter_merges_and_resorts() {
        let params = QueryComposer::<Tweet>::new()
            .expand(TweetExpansion::GeoPlaceId(FieldSelector::from([PlaceField::Name])))
            .parameter("place.fields", "country,name")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(params.names(), ["expansions", "place.fields"]);
        assert_eq!(params.value_of("place.fields").as_deref(), Some("country,name"));
    }

    #[test]
    fn test_other_parameters_are_validated() {
        let err = QueryComposer::<User>::new()
            .parameter("user.fields", "created_at,followers")
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown field `followers` for entity `user`");

        let err = QueryComposer::<User>::new()
            .parameter("expansions", "author_id")
            .unwrap_err();
        assert!(err.is_schema_violation());

        let err = QueryComposer::<User>::new().parameter(" ", "x").unwrap_err();
        assert!(matches!(err, QueryError::InvalidParameter { .. }));
    }

    #[test]
    fn test_empty_opaque_value_is_dropped() {
        let params = build::<User>(
            &FieldSelector::from([UserField::Url]),
            &ExpansionSelector::empty(),
            [QueryParameter::new("pagination_token", [""])],
        )
        .unwrap();
        assert_eq!(params.names(), ["user.fields"]);
    }

    #[test]
    fn test_repeated_opaque_parameter_unions_tokens() {
        let params = QueryComposer::<User>::new()
            .field(UserField::Url)
            .parameter("ids", "1,2")
            .unwrap()
            .parameter("ids", "2")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(params.to_string(), "user.fields=url&ids=1,2");
    }

    #[test]
    fn test_joined_opaque_value_merges_into_split_tokens() {
        let params = QueryComposer::<User>::new()
            .raw_parameter(QueryParameter::new("ids", ["1", "2"]))
            .unwrap()
            .parameter("ids", "1,2")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(params.to_string(), "ids=1,2");
        assert_eq!(params.get("ids").unwrap().values(), ["1", "2"]);
    }

    #[test]
    fn test_build_is_repeatable() {
        let composer = QueryComposer::<User>::new()
            .field(UserField::Verified)
            .expand(UserExpansion::PinnedTweetId(FieldSelector::all()));
        assert_eq!(composer.build().unwrap(), composer.build().unwrap());
    }
}
