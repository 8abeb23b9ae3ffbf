use chrono::{TimeZone, Utc};
use tweeter_core::model::tweet::TWEET_CONTENT_MAX_CHARS;
use tweeter_core::{DateInput, ErrorKind, Tweet, ValidationError};
use uuid::Uuid;

const TWEET_ID: &str = "3f2504e0-4f89-11d3-9a0c-0305e82c3301";
const PROFILE_ID: &str = "11111111-2222-4333-8444-555555555555";

#[test]
fn new_accepts_text_and_parsed_ids() {
    let profile = Uuid::parse_str(PROFILE_ID).unwrap();
    let tweet = Tweet::new(TWEET_ID, profile, "  hello world  ", None).unwrap();

    assert_eq!(tweet.id().to_string(), TWEET_ID);
    assert_eq!(tweet.profile_id(), profile);
    assert_eq!(tweet.content(), "hello world");
}

#[test]
fn missing_date_defaults_to_now() {
    let before = Utc::now() - chrono::Duration::seconds(1);
    let tweet = Tweet::create(PROFILE_ID, "just now").unwrap();
    let after = Utc::now() + chrono::Duration::seconds(1);

    assert!(tweet.date() >= before && tweet.date() <= after);
    assert!(!tweet.id().is_nil());
}

#[test]
fn content_at_limit_is_accepted_and_one_over_is_rejected() {
    let at_limit = "x".repeat(TWEET_CONTENT_MAX_CHARS);
    assert!(Tweet::create(PROFILE_ID, &at_limit).is_ok());

    let err = Tweet::create(PROFILE_ID, &"x".repeat(TWEET_CONTENT_MAX_CHARS + 1)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::ValueTooLong {
            field: "tweetContent",
            max: 140,
            actual: 141,
        }
    );
}

#[test]
fn construction_stops_at_first_invalid_field() {
    let err = Tweet::new("bogus", "also bogus", "", Some("never".into())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
    assert_eq!(err.field(), "tweetId");

    let err = Tweet::new(TWEET_ID, "also bogus", "", None).unwrap_err();
    assert_eq!(err.field(), "tweetProfileId");

    let err = Tweet::new(TWEET_ID, PROFILE_ID, "   ", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyOrUnsafeInput);

    let err = Tweet::new(TWEET_ID, PROFILE_ID, "ok", Some("2019-02-29".into())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDate);
}

#[test]
fn failed_setter_leaves_tweet_unchanged() {
    let mut tweet = Tweet::new(TWEET_ID, PROFILE_ID, "original", None).unwrap();
    let snapshot = tweet.clone();

    assert!(tweet.set_content("").is_err());
    assert!(tweet.set_profile_id("nope").is_err());
    assert!(tweet.set_date(Some("2020-13-40".into())).is_err());
    assert_eq!(tweet, snapshot);

    tweet.set_content("edited").unwrap();
    assert_eq!(tweet.content(), "edited");
}

#[test]
fn set_date_accepts_structured_values() {
    let mut tweet = Tweet::create(PROFILE_ID, "dated").unwrap();
    let at = Utc.with_ymd_and_hms(2021, 6, 15, 8, 30, 0).unwrap();

    tweet.set_date(Some(DateInput::from(at))).unwrap();
    assert_eq!(tweet.date(), at);

    tweet.set_date(Some(at.naive_utc().into())).unwrap();
    assert_eq!(tweet.date(), at);
}

#[test]
fn serialization_uses_string_ids_and_epoch_millis() {
    let tweet = Tweet::new(
        TWEET_ID,
        PROFILE_ID,
        "happy new year",
        Some("2020-01-01T00:00:00".into()),
    )
    .unwrap();

    let json = serde_json::to_value(&tweet).unwrap();
    assert_eq!(json["tweetId"], "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
    assert_eq!(json["tweetId"].as_str().unwrap().len(), 36);
    assert_eq!(json["tweetProfileId"], PROFILE_ID);
    assert_eq!(json["tweetContent"], "happy new year");
    assert_eq!(json["tweetDate"], 1_577_836_800_000_i64);
    assert_eq!(json.as_object().unwrap().len(), 4);
}
