//! Core data access for the tweeter application.
//! This crate is the single source of truth for author and tweet invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::author::{Author, AuthorId};
pub use model::tweet::{Tweet, TweetId};
pub use model::validate::{DateInput, ErrorKind, IdInput, ValidationError};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::tweet_repo::{SqliteTweetRepository, TweetRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
