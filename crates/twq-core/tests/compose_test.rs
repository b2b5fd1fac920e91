//! End-to-end composition scenarios across entity types.

mod common;

use twq_core::{
    ExpansionEntry, ExpansionSelector, FieldSelector, MediaField, PollField, QueryComposer,
    QueryError, QueryParameter, SelectionConfig, Tweet, TweetExpansion, TweetField,
    TweetRelation, User, UserExpansion, UserField, build,
};

use common::init_test_tracing;

#[test]
fn user_lookup_with_pinned_tweet() {
    init_test_tracing();

    let pairs = QueryComposer::<User>::new()
        .field(UserField::Protected)
        .field(UserField::CreatedAt)
        .expand(UserExpansion::PinnedTweetId(FieldSelector::from([
            TweetField::CreatedAt,
        ])))
        .build()
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
fn nothing_selected_yields_no_parameters() {
    init_test_tracing();

    let params = build::<Tweet>(
        &FieldSelector::empty(),
        &ExpansionSelector::empty(),
        Vec::<QueryParameter>::new(),
    )
    .unwrap();
    assert!(params.is_empty());
    assert_eq!(params.to_string(), "");
}

#[test]
fn timeline_request_with_every_target_type() {
    init_test_tracing();

    let params = QueryComposer::<Tweet>::new()
        .fields(FieldSelector::from([
            TweetField::PublicMetrics,
            TweetField::CreatedAt,
            TweetField::Attachments,
        ]))
        .expand(TweetExpansion::ReferencedTweetsIdAuthorId(FieldSelector::from([
            UserField::Verified,
        ])))
        .expand(TweetExpansion::AuthorId(FieldSelector::from([
            UserField::ProfileImageUrl,
        ])))
        .expand(TweetExpansion::AttachmentsPollIds(FieldSelector::from([
            PollField::VotingStatus,
            PollField::EndDatetime,
        ])))
        .expand(TweetExpansion::AttachmentsMediaKeys(FieldSelector::from([
            MediaField::PreviewImageUrl,
        ])))
        .expand(TweetRelation::GeoPlaceId)
        .parameter("max_results", "100")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        params.names(),
        [
            "tweet.fields",
            "expansions",
            "poll.fields",
            "media.fields",
            "user.fields",
            "max_results",
        ]
    );
    assert_eq!(
        params.value_of("tweet.fields").as_deref(),
        Some("attachments,created_at,public_metrics")
    );
    assert_eq!(
        params.value_of("expansions").as_deref(),
        Some(
            "attachments.poll_ids,attachments.media_keys,author_id,geo.place_id,referenced_tweets.id.author_id"
        )
    );
    assert_eq!(
        params.value_of("poll.fields").as_deref(),
        Some("end_datetime,voting_status")
    );
    assert_eq!(
        params.value_of("user.fields").as_deref(),
        Some("profile_image_url,verified")
    );
}

#[test]
fn referenced_tweet_fields_share_the_root_parameter() {
    init_test_tracing();

    let params = QueryComposer::<Tweet>::new()
        .field(TweetField::Lang)
        .expand(TweetExpansion::ReferencedTweetsId(FieldSelector::from([
            TweetField::AuthorId,
        ])))
        .build()
        .unwrap();

    assert_eq!(
        params.to_string(),
        "tweet.fields=author_id,lang&expansions=referenced_tweets.id"
    );
}

#[test]
fn nested_fields_without_root_fields_still_use_the_root_name() {
    init_test_tracing();

    let params = QueryComposer::<Tweet>::new()
        .expand(TweetExpansion::ReferencedTweetsId(FieldSelector::from([
            TweetField::Source,
        ])))
        .build()
        .unwrap();

    assert_eq!(params.names(), ["expansions", "tweet.fields"]);
}

#[test]
fn last_expansion_of_a_relation_wins() {
    init_test_tracing();

    let params = QueryComposer::<Tweet>::new()
        .expand(TweetExpansion::AuthorId(FieldSelector::from([UserField::Url])))
        .expand(TweetRelation::AuthorId)
        .build()
        .unwrap();

    assert_eq!(params.to_string(), "expansions=author_id");
}

#[test]
fn selection_document_matches_typed_builder() {
    init_test_tracing();

    let config = SelectionConfig::from_json_str(
        r#"{
            "entity": "tweet",
            "fields": ["lang"],
            "expansions": [
                {"relation": "author_id", "fields": ["verified"]},
                "attachments.media_keys"
            ]
        }"#,
    )
    .unwrap();

    let typed = QueryComposer::<Tweet>::new()
        .field(TweetField::Lang)
        .expand(TweetExpansion::AuthorId(FieldSelector::from([
            UserField::Verified,
        ])))
        .expand(TweetRelation::AttachmentsMediaKeys)
        .build()
        .unwrap();

    assert_eq!(config.compose().unwrap(), typed);
}

#[test]
fn selection_document_built_from_text_entries() {
    init_test_tracing();

    let mut config = SelectionConfig::new("user".parse().unwrap());
    config.fields.push("created_at,url".into());
    config
        .expansions
        .push("pinned_tweet_id=created_at,lang".parse::<ExpansionEntry>().unwrap());

    assert_eq!(
        config.compose().unwrap().to_string(),
        "user.fields=created_at,url&expansions=pinned_tweet_id&tweet.fields=created_at,lang"
    );
}

#[test]
fn schema_violations_surface_from_every_entry_point() {
    init_test_tracing();

    let err = FieldSelector::<UserField>::parse(["username"]).unwrap_err();
    assert!(err.is_schema_violation());

    let bad: &[&str] = &["bogus"];
    let err = ExpansionSelector::<TweetExpansion>::parse([("author_id", bad)]).unwrap_err();
    assert_eq!(err.to_string(), "unknown field `bogus` for entity `user`");

    let err = QueryComposer::<Tweet>::new()
        .parameter("expansions", "pinned_tweet_id")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown expansion `pinned_tweet_id` for entity `tweet`"
    );

    let config =
        SelectionConfig::from_json_str(r#"{"entity": "user", "expansions": ["author_id"]}"#)
            .unwrap();
    let err = config.compose().unwrap_err();
    assert!(matches!(
        err,
        QueryError::SchemaViolation { ref token, .. } if token == "author_id"
    ));
}

#[test]
fn caller_parameters_sharing_a_name_union_their_values() {
    init_test_tracing();

    let params = build::<Tweet>(
        &FieldSelector::from([TweetField::Lang]),
        &ExpansionSelector::empty(),
        [
            QueryParameter::new("ids", ["20,1460323737035677698"]),
            QueryParameter::new("max_results", ["10"]),
            QueryParameter::new("ids", ["1460323737035677698", "21"]),
        ],
    )
    .unwrap();

    assert_eq!(
        params.into_pairs(),
        vec![
            ("tweet.fields".to_string(), "lang".to_string()),
            ("ids".to_string(), "20,1460323737035677698,21".to_string()),
            ("max_results".to_string(), "10".to_string()),
        ]
    );
}
