//! Tweet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate `Tweet` values to and from `tweet` rows.
//! - Keep SQL text and parameter binding inside the persistence boundary.
//!
//! # Invariants
//! - Ids are bound as raw 16-byte blobs, dates as
//!   `YYYY-MM-DD HH:MM:SS.ffffff` text.
//! - Every row is hydrated through `Tweet::new`; a row that fails validation
//!   aborts the whole call with `RepoError::InvalidData`.
//! - Absence is never an error: lookups return `None` or an empty `Vec`.
//! - Multi-row results come back in insertion order.

use crate::model::author::AuthorId;
use crate::model::tweet::{
    Tweet, TweetId, TWEET_CONTENT_FIELD, TWEET_CONTENT_MAX_CHARS, TWEET_ID_FIELD,
    TWEET_PROFILE_ID_FIELD,
};
use crate::model::validate::{
    escape_like, format_db_date, validate_bounded_text, validate_uuid, IdInput,
};
use crate::repo::error::{decode_column, invalid_row, map_insert_error, RepoResult};
use crate::repo::schema_guard::ensure_table_ready;
use rusqlite::{params, Connection, Params, Row};

const TWEET_TABLE: &str = "tweet";
const TWEET_COLUMNS: &[&str] = &["tweetId", "tweetProfileId", "tweetContent", "tweetDate"];

const TWEET_SELECT_SQL: &str = "SELECT
    tweetId,
    tweetProfileId,
    tweetContent,
    tweetDate
FROM tweet";

/// Repository interface for tweet persistence.
pub trait TweetRepository {
    /// Inserts a new row. Fails with `AlreadyExists` on a duplicate id.
    fn insert(&self, tweet: &Tweet) -> RepoResult<()>;
    /// Rewrites every mutable column of the row keyed by `tweet.id()`.
    fn update(&self, tweet: &Tweet) -> RepoResult<()>;
    /// Removes the row keyed by `tweet.id()`.
    fn delete(&self, tweet: &Tweet) -> RepoResult<()>;
    fn find_by_id<'a>(&self, id: impl Into<IdInput<'a>>) -> RepoResult<Option<Tweet>>;
    fn find_by_profile_id<'a>(&self, profile_id: impl Into<IdInput<'a>>)
        -> RepoResult<Vec<Tweet>>;
    /// Substring search on content; `%` and `_` in `text` match literally.
    fn find_by_content(&self, text: &str) -> RepoResult<Vec<Tweet>>;
    fn find_all(&self) -> RepoResult<Vec<Tweet>>;
}

/// SQLite-backed tweet repository.
pub struct SqliteTweetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTweetRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   not the one this crate writes.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, TWEET_TABLE, TWEET_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query_tweets(&self, sql: &str, params: impl Params) -> RepoResult<Vec<Tweet>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut tweets = Vec::new();

        while let Some(row) = rows.next()? {
            tweets.push(parse_tweet_row(row)?);
        }

        Ok(tweets)
    }
}

impl TweetRepository for SqliteTweetRepository<'_> {
    fn insert(&self, tweet: &Tweet) -> RepoResult<()> {
        let id = tweet.id();
        let profile_id = tweet.profile_id();

        self.conn
            .execute(
                "INSERT INTO tweet (
                    tweetId,
                    tweetProfileId,
                    tweetContent,
                    tweetDate
                ) VALUES (?1, ?2, ?3, ?4);",
                params![
                    id.as_bytes().as_slice(),
                    profile_id.as_bytes().as_slice(),
                    tweet.content(),
                    format_db_date(&tweet.date()),
                ],
            )
            .map_err(|err| map_insert_error(self.conn, err, TWEET_TABLE, TWEET_ID_FIELD, id))?;

        Ok(())
    }

    fn update(&self, tweet: &Tweet) -> RepoResult<()> {
        let id = tweet.id();
        let profile_id = tweet.profile_id();

        self.conn.execute(
            "UPDATE tweet
             SET
                tweetProfileId = ?1,
                tweetContent = ?2,
                tweetDate = ?3
             WHERE tweetId = ?4;",
            params![
                profile_id.as_bytes().as_slice(),
                tweet.content(),
                format_db_date(&tweet.date()),
                id.as_bytes().as_slice(),
            ],
        )?;

        Ok(())
    }

    fn delete(&self, tweet: &Tweet) -> RepoResult<()> {
        let id = tweet.id();
        self.conn
            .execute("DELETE FROM tweet WHERE tweetId = ?1;", [id.as_bytes().as_slice()])?;
        Ok(())
    }

    fn find_by_id<'a>(&self, id: impl Into<IdInput<'a>>) -> RepoResult<Option<Tweet>> {
        let id: TweetId = validate_uuid(TWEET_ID_FIELD, id)?;
        let mut tweets = self.query_tweets(
            &format!("{TWEET_SELECT_SQL} WHERE tweetId = ?1;"),
            [id.as_bytes().as_slice()],
        )?;
        Ok(tweets.pop())
    }

    fn find_by_profile_id<'a>(
        &self,
        profile_id: impl Into<IdInput<'a>>,
    ) -> RepoResult<Vec<Tweet>> {
        let profile_id: AuthorId = validate_uuid(TWEET_PROFILE_ID_FIELD, profile_id)?;
        self.query_tweets(
            &format!("{TWEET_SELECT_SQL} WHERE tweetProfileId = ?1 ORDER BY rowid;"),
            [profile_id.as_bytes().as_slice()],
        )
    }

    fn find_by_content(&self, text: &str) -> RepoResult<Vec<Tweet>> {
        let needle = validate_bounded_text(TWEET_CONTENT_FIELD, text, TWEET_CONTENT_MAX_CHARS)?;
        let pattern = format!("%{}%", escape_like(&needle));
        self.query_tweets(
            &format!(r"{TWEET_SELECT_SQL} WHERE tweetContent LIKE ?1 ESCAPE '\' ORDER BY rowid;"),
            [pattern],
        )
    }

    fn find_all(&self) -> RepoResult<Vec<Tweet>> {
        self.query_tweets(&format!("{TWEET_SELECT_SQL} ORDER BY rowid;"), [])
    }
}

fn parse_tweet_row(row: &Row<'_>) -> RepoResult<Tweet> {
    let id: Vec<u8> = decode_column(row, TWEET_TABLE, "tweetId")?;
    let profile_id: Vec<u8> = decode_column(row, TWEET_TABLE, "tweetProfileId")?;
    let content: String = decode_column(row, TWEET_TABLE, "tweetContent")?;
    let date: String = decode_column(row, TWEET_TABLE, "tweetDate")?;

    Tweet::new(&id, &profile_id, &content, Some(date.into()))
        .map_err(|err| invalid_row(TWEET_TABLE, err))
}
