#![allow(dead_code)]

use rusqlite::Connection;
use tweeter_core::{Author, AuthorRepository, SqliteAuthorRepository, Tweet};
use uuid::Uuid;

/// A well-formed argon2id hash (97 characters).
pub const ARGON2ID_HASH: &str = "$argon2id$v=19$m=65536,t=4,p=1$AAECAwQFBgcICQoLDA0ODw$vluugnoT2Y1NJbkoisl1xj5Deo3HU8sgfT60Pf56zMM";

pub const ACTIVATION_TOKEN: &str = "0123456789abcdef0123456789abcdef";

pub fn author(username: &str) -> Author {
    Author::create(&format!("{username}@example.com"), ARGON2ID_HASH, username).unwrap()
}

pub fn insert_author(conn: &Connection, username: &str) -> Author {
    let author = author(username);
    SqliteAuthorRepository::try_new(conn)
        .unwrap()
        .insert(&author)
        .unwrap();
    author
}

pub fn tweet_at(id: &str, profile_id: Uuid, content: &str) -> Tweet {
    Tweet::new(id, profile_id, content, Some("2024-03-01 12:00:00.250000".into())).unwrap()
}
