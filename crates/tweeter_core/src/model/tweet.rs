//! Tweet domain model.
//!
//! # Responsibility
//! - Hold one validated tweet record.
//! - Define the reviewed JSON projection of a tweet.
//!
//! # Invariants
//! - `id` never changes after construction.
//! - `content` is sanitized, non-empty and at most
//!   [`TWEET_CONTENT_MAX_CHARS`] characters.
//! - `date` is UTC with microsecond precision.

use crate::model::author::AuthorId;
use crate::model::validate::{
    validate_bounded_text, validate_date, validate_uuid, DateInput, IdInput, ValidationResult,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stable tweet identifier.
pub type TweetId = Uuid;

pub const TWEET_CONTENT_MAX_CHARS: usize = 140;

pub(crate) const TWEET_ID_FIELD: &str = "tweetId";
pub(crate) const TWEET_PROFILE_ID_FIELD: &str = "tweetProfileId";
pub(crate) const TWEET_CONTENT_FIELD: &str = "tweetContent";
pub(crate) const TWEET_DATE_FIELD: &str = "tweetDate";

/// A short message posted by an author.
///
/// Serialized as `{tweetId, tweetProfileId, tweetContent, tweetDate}` with
/// `tweetDate` in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tweet {
    #[serde(rename = "tweetId")]
    id: TweetId,
    #[serde(rename = "tweetProfileId")]
    profile_id: AuthorId,
    #[serde(rename = "tweetContent")]
    content: String,
    #[serde(rename = "tweetDate", with = "chrono::serde::ts_milliseconds")]
    date: DateTime<Utc>,
}

impl Tweet {
    /// Builds a tweet from caller-supplied values.
    ///
    /// Fields are checked in order id, profile id, content, date and the
    /// first failure is returned. A `None` date means now.
    pub fn new<'a, 'b>(
        id: impl Into<IdInput<'a>>,
        profile_id: impl Into<IdInput<'b>>,
        content: &str,
        date: Option<DateInput>,
    ) -> ValidationResult<Self> {
        let id = validate_uuid(TWEET_ID_FIELD, id)?;
        let profile_id = validate_uuid(TWEET_PROFILE_ID_FIELD, profile_id)?;
        let content =
            validate_bounded_text(TWEET_CONTENT_FIELD, content, TWEET_CONTENT_MAX_CHARS)?;
        let date = validate_date(TWEET_DATE_FIELD, date)?;

        Ok(Self {
            id,
            profile_id,
            content,
            date,
        })
    }

    /// Builds a new tweet with a generated id, dated now.
    pub fn create<'a>(profile_id: impl Into<IdInput<'a>>, content: &str) -> ValidationResult<Self> {
        Self::new(Uuid::new_v4(), profile_id, content, None)
    }

    pub fn id(&self) -> TweetId {
        self.id
    }

    pub fn profile_id(&self) -> AuthorId {
        self.profile_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Re-points the tweet at another author profile.
    pub fn set_profile_id<'a>(&mut self, profile_id: impl Into<IdInput<'a>>) -> ValidationResult<()> {
        self.profile_id = validate_uuid(TWEET_PROFILE_ID_FIELD, profile_id)?;
        Ok(())
    }

    /// Replaces the message body. The tweet is unchanged on error.
    pub fn set_content(&mut self, content: &str) -> ValidationResult<()> {
        self.content =
            validate_bounded_text(TWEET_CONTENT_FIELD, content, TWEET_CONTENT_MAX_CHARS)?;
        Ok(())
    }

    /// Replaces the timestamp; `None` means now.
    pub fn set_date(&mut self, date: Option<DateInput>) -> ValidationResult<()> {
        self.date = validate_date(TWEET_DATE_FIELD, date)?;
        Ok(())
    }
}
