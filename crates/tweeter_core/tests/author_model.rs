mod common;

use common::{ACTIVATION_TOKEN, ARGON2ID_HASH};
use tweeter_core::model::author::{AUTHOR_AVATAR_URL_MAX_CHARS, AUTHOR_USERNAME_MAX_CHARS};
use tweeter_core::{Author, ErrorKind};

const AUTHOR_ID: &str = "0b9a9b1e-7c1d-4f6e-9e4a-2f4d6c8b0a11";

fn full_author() -> Author {
    Author::new(
        AUTHOR_ID,
        Some("https://cdn.example.com/avatar.png"),
        Some(ACTIVATION_TOKEN),
        "ada@example.com",
        ARGON2ID_HASH,
        "ada",
    )
    .unwrap()
}

#[test]
fn new_normalizes_every_field() {
    let author = Author::new(
        AUTHOR_ID,
        Some(" https://cdn.example.com/avatar.png "),
        Some(" 0123456789ABCDEF0123456789ABCDEF "),
        " ada@example.com ",
        ARGON2ID_HASH,
        "  ada  ",
    )
    .unwrap();

    assert_eq!(author.id().to_string(), AUTHOR_ID);
    assert_eq!(author.avatar_url(), Some("https://cdn.example.com/avatar.png"));
    assert_eq!(author.activation_token(), Some(ACTIVATION_TOKEN));
    assert_eq!(author.email(), "ada@example.com");
    assert_eq!(author.hash(), ARGON2ID_HASH);
    assert_eq!(author.username(), "ada");
}

#[test]
fn create_leaves_optional_fields_empty() {
    let author = Author::create("grace@example.com", ARGON2ID_HASH, "grace").unwrap();
    assert!(author.avatar_url().is_none());
    assert!(author.activation_token().is_none());
    assert!(!author.id().is_nil());
}

#[test]
fn each_field_reports_its_own_failure() {
    let cases = [
        (
            Author::new("x", None, None, "a@example.com", ARGON2ID_HASH, "a"),
            ErrorKind::InvalidIdentifier,
            "authorId",
        ),
        (
            Author::new(AUTHOR_ID, Some("  "), None, "a@example.com", ARGON2ID_HASH, "a"),
            ErrorKind::EmptyOrUnsafeInput,
            "authorAvatarUrl",
        ),
        (
            Author::new(AUTHOR_ID, None, Some("zz"), "a@example.com", ARGON2ID_HASH, "a"),
            ErrorKind::InvalidFormat,
            "authorActivationToken",
        ),
        (
            Author::new(AUTHOR_ID, None, Some("abc123"), "a@example.com", ARGON2ID_HASH, "a"),
            ErrorKind::WrongLength,
            "authorActivationToken",
        ),
        (
            Author::new(AUTHOR_ID, None, None, "not-an-email", ARGON2ID_HASH, "a"),
            ErrorKind::InvalidFormat,
            "authorEmail",
        ),
        (
            Author::new(AUTHOR_ID, None, None, "a@example.com", "hunter2", "a"),
            ErrorKind::InvalidFormat,
            "authorHash",
        ),
        (
            Author::new(AUTHOR_ID, None, None, "a@example.com", "   ", "a"),
            ErrorKind::EmptyOrUnsafeInput,
            "authorHash",
        ),
        (
            Author::new(AUTHOR_ID, None, None, "a@example.com", ARGON2ID_HASH, "<i></i>"),
            ErrorKind::EmptyOrUnsafeInput,
            "authorUsername",
        ),
    ];

    for (result, kind, field) in cases {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), kind, "field {field}");
        assert_eq!(err.field(), field);
    }
}

#[test]
fn length_limits_are_enforced() {
    let mut author = full_author();

    let long_url = format!("https://example.com/{}", "a".repeat(AUTHOR_AVATAR_URL_MAX_CHARS));
    let err = author.set_avatar_url(Some(&long_url)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueTooLong);

    let err = author
        .set_username(&"u".repeat(AUTHOR_USERNAME_MAX_CHARS + 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueTooLong);
    author
        .set_username(&"u".repeat(AUTHOR_USERNAME_MAX_CHARS))
        .unwrap();

    let long_email = format!("{}@{}.com", "a".repeat(64), "b".repeat(60));
    let err = author.set_email(&long_email).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueTooLong);
}

#[test]
fn setters_can_clear_nullable_fields() {
    let mut author = full_author();
    author.set_avatar_url(None).unwrap();
    author.set_activation_token(None).unwrap();

    assert!(author.avatar_url().is_none());
    assert!(author.activation_token().is_none());
}

#[test]
fn failed_setter_leaves_author_unchanged() {
    let mut author = full_author();
    let snapshot = author.clone();

    assert!(author.set_email("broken").is_err());
    assert!(author.set_hash("broken").is_err());
    assert!(author.set_activation_token(Some("broken")).is_err());
    assert_eq!(author, snapshot);
}

#[test]
fn serialization_excludes_credentials() {
    let author = full_author();
    let json = serde_json::to_value(&author).unwrap();

    assert_eq!(json["authorId"], AUTHOR_ID);
    assert_eq!(json["authorAvatarUrl"], "https://cdn.example.com/avatar.png");
    assert_eq!(json["authorEmail"], "ada@example.com");
    assert_eq!(json["authorUsername"], "ada");
    assert!(json.get("authorHash").is_none());
    assert!(json.get("authorActivationToken").is_none());
    assert!(!json.to_string().contains("argon2id"));
}

#[test]
fn serialization_renders_missing_avatar_as_null() {
    let author = Author::create("grace@example.com", ARGON2ID_HASH, "grace").unwrap();
    let json = serde_json::to_value(&author).unwrap();
    assert!(json["authorAvatarUrl"].is_null());
}
