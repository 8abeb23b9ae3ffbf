//! Repository layer: one persistence gateway per entity.
//!
//! # Responsibility
//! - Define data access contracts for authors and tweets.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Repositories borrow a connection that `db::open_db*` has migrated.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every error maps onto one `ErrorKind`.

pub mod author_repo;
pub mod error;
mod schema_guard;
pub mod tweet_repo;
