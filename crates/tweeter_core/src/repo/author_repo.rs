//! Author repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate `Author` values to and from `author` rows.
//! - Provide the unique-key lookups (email, activation token) used by sign-in
//!   and account activation flows.
//!
//! # Invariants
//! - Same binding and hydration rules as the tweet repository.
//! - Deleting an author that still owns tweets fails with a foreign-key
//!   violation; nothing cascades.

use crate::model::author::{
    Author, AuthorId, AUTHOR_ACTIVATION_TOKEN_CHARS, AUTHOR_ACTIVATION_TOKEN_FIELD,
    AUTHOR_EMAIL_FIELD, AUTHOR_EMAIL_MAX_CHARS, AUTHOR_ID_FIELD, AUTHOR_USERNAME_FIELD,
    AUTHOR_USERNAME_MAX_CHARS,
};
use crate::model::validate::{
    escape_like, validate_bounded_text, validate_email, validate_hex_token, validate_uuid,
    IdInput,
};
use crate::repo::error::{decode_column, invalid_row, map_insert_error, RepoResult};
use crate::repo::schema_guard::ensure_table_ready;
use rusqlite::{params, Connection, Params, Row};

const AUTHOR_TABLE: &str = "author";
const AUTHOR_COLUMNS: &[&str] = &[
    "authorId",
    "authorAvatarUrl",
    "authorActivationToken",
    "authorEmail",
    "authorHash",
    "authorUsername",
];

const AUTHOR_SELECT_SQL: &str = "SELECT
    authorId,
    authorAvatarUrl,
    authorActivationToken,
    authorEmail,
    authorHash,
    authorUsername
FROM author";

/// Repository interface for author persistence.
pub trait AuthorRepository {
    fn insert(&self, author: &Author) -> RepoResult<()>;
    fn update(&self, author: &Author) -> RepoResult<()>;
    fn delete(&self, author: &Author) -> RepoResult<()>;
    fn find_by_id<'a>(&self, id: impl Into<IdInput<'a>>) -> RepoResult<Option<Author>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Author>>;
    fn find_by_activation_token(&self, token: &str) -> RepoResult<Option<Author>>;
    /// Substring search on username with literal `%`/`_` matching.
    fn find_by_username(&self, text: &str) -> RepoResult<Vec<Author>>;
    fn find_all(&self) -> RepoResult<Vec<Author>>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, AUTHOR_TABLE, AUTHOR_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query_authors(&self, sql: &str, params: impl Params) -> RepoResult<Vec<Author>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut authors = Vec::new();

        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }

        Ok(authors)
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn insert(&self, author: &Author) -> RepoResult<()> {
        let id = author.id();

        self.conn
            .execute(
                "INSERT INTO author (
                    authorId,
                    authorAvatarUrl,
                    authorActivationToken,
                    authorEmail,
                    authorHash,
                    authorUsername
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    id.as_bytes().as_slice(),
                    author.avatar_url(),
                    author.activation_token(),
                    author.email(),
                    author.hash(),
                    author.username(),
                ],
            )
            .map_err(|err| map_insert_error(self.conn, err, AUTHOR_TABLE, AUTHOR_ID_FIELD, id))?;

        Ok(())
    }

    fn update(&self, author: &Author) -> RepoResult<()> {
        let id = author.id();

        self.conn.execute(
            "UPDATE author
             SET
                authorAvatarUrl = ?1,
                authorActivationToken = ?2,
                authorEmail = ?3,
                authorHash = ?4,
                authorUsername = ?5
             WHERE authorId = ?6;",
            params![
                author.avatar_url(),
                author.activation_token(),
                author.email(),
                author.hash(),
                author.username(),
                id.as_bytes().as_slice(),
            ],
        )?;

        Ok(())
    }

    fn delete(&self, author: &Author) -> RepoResult<()> {
        let id = author.id();
        self.conn.execute(
            "DELETE FROM author WHERE authorId = ?1;",
            [id.as_bytes().as_slice()],
        )?;
        Ok(())
    }

    fn find_by_id<'a>(&self, id: impl Into<IdInput<'a>>) -> RepoResult<Option<Author>> {
        let id: AuthorId = validate_uuid(AUTHOR_ID_FIELD, id)?;
        let mut authors = self.query_authors(
            &format!("{AUTHOR_SELECT_SQL} WHERE authorId = ?1;"),
            [id.as_bytes().as_slice()],
        )?;
        Ok(authors.pop())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Author>> {
        let email = validate_email(AUTHOR_EMAIL_FIELD, email, AUTHOR_EMAIL_MAX_CHARS)?;
        let mut authors = self.query_authors(
            &format!("{AUTHOR_SELECT_SQL} WHERE authorEmail = ?1;"),
            [email],
        )?;
        Ok(authors.pop())
    }

    fn find_by_activation_token(&self, token: &str) -> RepoResult<Option<Author>> {
        let token = validate_hex_token(
            AUTHOR_ACTIVATION_TOKEN_FIELD,
            Some(token),
            AUTHOR_ACTIVATION_TOKEN_CHARS,
        )?
        .unwrap_or_default();

        // Tokens are random but not unique-constrained; the oldest holder wins.
        let authors = self.query_authors(
            &format!("{AUTHOR_SELECT_SQL} WHERE authorActivationToken = ?1 ORDER BY rowid;"),
            [token],
        )?;
        Ok(authors.into_iter().next())
    }

    fn find_by_username(&self, text: &str) -> RepoResult<Vec<Author>> {
        let needle =
            validate_bounded_text(AUTHOR_USERNAME_FIELD, text, AUTHOR_USERNAME_MAX_CHARS)?;
        let pattern = format!("%{}%", escape_like(&needle));
        self.query_authors(
            &format!(r"{AUTHOR_SELECT_SQL} WHERE authorUsername LIKE ?1 ESCAPE '\' ORDER BY rowid;"),
            [pattern],
        )
    }

    fn find_all(&self) -> RepoResult<Vec<Author>> {
        self.query_authors(&format!("{AUTHOR_SELECT_SQL} ORDER BY rowid;"), [])
    }
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id: Vec<u8> = decode_column(row, AUTHOR_TABLE, "authorId")?;
    let avatar_url: Option<String> = decode_column(row, AUTHOR_TABLE, "authorAvatarUrl")?;
    let activation_token: Option<String> =
        decode_column(row, AUTHOR_TABLE, "authorActivationToken")?;
    let email: String = decode_column(row, AUTHOR_TABLE, "authorEmail")?;
    let hash: String = decode_column(row, AUTHOR_TABLE, "authorHash")?;
    let username: String = decode_column(row, AUTHOR_TABLE, "authorUsername")?;

    Author::new(
        &id,
        avatar_url.as_deref(),
        activation_token.as_deref(),
        &email,
        &hash,
        &username,
    )
    .map_err(|err| invalid_row(AUTHOR_TABLE, err))
}
