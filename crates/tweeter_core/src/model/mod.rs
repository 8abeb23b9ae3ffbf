//! Domain model for authors and their tweets.
//!
//! # Responsibility
//! - Define the validated in-memory records that mirror `author` and `tweet`
//!   rows.
//! - Share one set of field validators between both entities.
//!
//! # Invariants
//! - Entities are only reachable through validating constructors; fields are
//!   private and change only through validating setters.
//! - A failed setter leaves the entity exactly as it was.

pub mod author;
pub mod tweet;
pub mod validate;
