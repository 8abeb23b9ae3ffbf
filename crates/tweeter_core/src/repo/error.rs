//! Repository error type shared by the author and tweet gateways.

use crate::db::DbError;
use crate::model::validate::{ErrorKind, ValidationError};
use log::{error, warn};
use rusqlite::types::FromSql;
use rusqlite::{Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a repository call.
#[derive(Debug)]
pub enum RepoError {
    /// A search key or entity failed field validation before any SQL ran.
    Validation(ValidationError),
    /// Driver-level failure, passed through unchanged.
    Db(DbError),
    /// Insert collided with an existing primary key.
    AlreadyExists { table: &'static str, id: Uuid },
    /// A stored row could not be hydrated into a valid entity.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns the tagged kind; everything but validation is `Persistence`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(err) => err.kind(),
            _ => ErrorKind::Persistence,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyExists { table, id } => write!(f, "{table} already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps an INSERT failure, singling out primary-key collisions.
///
/// SQLite reports whichever constraint it checks first, so a re-inserted
/// author can surface as a `UNIQUE` failure on email or username. Any
/// constraint failure is therefore confirmed against the stored ids.
pub(crate) fn map_insert_error(
    conn: &Connection,
    err: rusqlite::Error,
    table: &'static str,
    id_column: &'static str,
    id: Uuid,
) -> RepoError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
        && row_exists(conn, table, id_column, id).unwrap_or(false)
    {
        warn!("event=row_insert module=repo status=duplicate table={table} id={id}");
        return RepoError::AlreadyExists { table, id };
    }

    RepoError::from(err)
}

fn row_exists(
    conn: &Connection,
    table: &'static str,
    id_column: &'static str,
    id: Uuid,
) -> rusqlite::Result<bool> {
    conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {id_column} = ?1);"),
        [id.as_bytes().as_slice()],
        |row| row.get(0),
    )
}

/// Reads one column, reporting a storage-type mismatch as corrupt data.
pub(crate) fn decode_column<T: FromSql>(
    row: &Row<'_>,
    table: &'static str,
    column: &'static str,
) -> RepoResult<T> {
    row.get(column).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::FromSqlConversionFailure(..) => {
            error!(
                "event=row_decode module=repo status=error table={table} field={column} error_kind=column_type"
            );
            RepoError::InvalidData(format!("{table}.{column} has an unexpected storage type"))
        }
        other => RepoError::from(other),
    })
}

/// Reports a stored row that no longer satisfies entity validation.
pub(crate) fn invalid_row(table: &'static str, err: ValidationError) -> RepoError {
    error!(
        "event=row_decode module=repo status=error table={table} field={} error_kind={:?}",
        err.field(),
        err.kind()
    );
    RepoError::InvalidData(format!("{table} row failed validation: {err}"))
}
