//! Author domain model.
//!
//! # Responsibility
//! - Hold one validated author profile.
//! - Keep credential material out of the serialized projection.
//!
//! # Invariants
//! - `id` never changes after construction.
//! - `hash` is always an encoded argon2id hash of exactly
//!   [`AUTHOR_HASH_CHARS`] characters.
//! - `activation_token`, when present, is lower-case hex of exactly
//!   [`AUTHOR_ACTIVATION_TOKEN_CHARS`] characters.
//! - `hash` and `activation_token` are never serialized.

use crate::model::validate::{
    validate_bounded_text, validate_email, validate_hex_token, validate_optional_url,
    validate_password_hash, validate_uuid, IdInput, ValidationResult,
};
use serde::Serialize;
use uuid::Uuid;

/// Stable author identifier, also referenced by `Tweet::profile_id`.
pub type AuthorId = Uuid;

pub const AUTHOR_AVATAR_URL_MAX_CHARS: usize = 255;
pub const AUTHOR_ACTIVATION_TOKEN_CHARS: usize = 32;
pub const AUTHOR_EMAIL_MAX_CHARS: usize = 128;
pub const AUTHOR_HASH_CHARS: usize = 97;
pub const AUTHOR_USERNAME_MAX_CHARS: usize = 32;

pub(crate) const AUTHOR_ID_FIELD: &str = "authorId";
pub(crate) const AUTHOR_AVATAR_URL_FIELD: &str = "authorAvatarUrl";
pub(crate) const AUTHOR_ACTIVATION_TOKEN_FIELD: &str = "authorActivationToken";
pub(crate) const AUTHOR_EMAIL_FIELD: &str = "authorEmail";
pub(crate) const AUTHOR_HASH_FIELD: &str = "authorHash";
pub(crate) const AUTHOR_USERNAME_FIELD: &str = "authorUsername";

/// A registered author profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    #[serde(rename = "authorId")]
    id: AuthorId,
    #[serde(rename = "authorAvatarUrl")]
    avatar_url: Option<String>,
    #[serde(skip_serializing)]
    activation_token: Option<String>,
    #[serde(rename = "authorEmail")]
    email: String,
    #[serde(skip_serializing)]
    hash: String,
    #[serde(rename = "authorUsername")]
    username: String,
}

impl Author {
    /// Builds an author from caller-supplied values.
    ///
    /// Fields are checked in declaration order (id, avatar url, activation
    /// token, email, hash, username); the first failure is returned.
    pub fn new<'a>(
        id: impl Into<IdInput<'a>>,
        avatar_url: Option<&str>,
        activation_token: Option<&str>,
        email: &str,
        hash: &str,
        username: &str,
    ) -> ValidationResult<Self> {
        let id = validate_uuid(AUTHOR_ID_FIELD, id)?;
        let avatar_url = validate_optional_url(
            AUTHOR_AVATAR_URL_FIELD,
            avatar_url,
            AUTHOR_AVATAR_URL_MAX_CHARS,
        )?;
        let activation_token = validate_hex_token(
            AUTHOR_ACTIVATION_TOKEN_FIELD,
            activation_token,
            AUTHOR_ACTIVATION_TOKEN_CHARS,
        )?;
        let email = validate_email(AUTHOR_EMAIL_FIELD, email, AUTHOR_EMAIL_MAX_CHARS)?;
        let hash = validate_password_hash(AUTHOR_HASH_FIELD, hash, AUTHOR_HASH_CHARS)?;
        let username =
            validate_bounded_text(AUTHOR_USERNAME_FIELD, username, AUTHOR_USERNAME_MAX_CHARS)?;

        Ok(Self {
            id,
            avatar_url,
            activation_token,
            email,
            hash,
            username,
        })
    }

    /// Builds a new author with a generated id, no avatar and no pending
    /// activation.
    pub fn create(email: &str, hash: &str, username: &str) -> ValidationResult<Self> {
        Self::new(Uuid::new_v4(), None, None, email, hash, username)
    }

    pub fn id(&self) -> AuthorId {
        self.id
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn activation_token(&self) -> Option<&str> {
        self.activation_token.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_avatar_url(&mut self, avatar_url: Option<&str>) -> ValidationResult<()> {
        self.avatar_url = validate_optional_url(
            AUTHOR_AVATAR_URL_FIELD,
            avatar_url,
            AUTHOR_AVATAR_URL_MAX_CHARS,
        )?;
        Ok(())
    }

    /// Sets or clears the pending activation token.
    pub fn set_activation_token(&mut self, activation_token: Option<&str>) -> ValidationResult<()> {
        self.activation_token = validate_hex_token(
            AUTHOR_ACTIVATION_TOKEN_FIELD,
            activation_token,
            AUTHOR_ACTIVATION_TOKEN_CHARS,
        )?;
        Ok(())
    }

    pub fn set_email(&mut self, email: &str) -> ValidationResult<()> {
        self.email = validate_email(AUTHOR_EMAIL_FIELD, email, AUTHOR_EMAIL_MAX_CHARS)?;
        Ok(())
    }

    pub fn set_hash(&mut self, hash: &str) -> ValidationResult<()> {
        self.hash = validate_password_hash(AUTHOR_HASH_FIELD, hash, AUTHOR_HASH_CHARS)?;
        Ok(())
    }

    pub fn set_username(&mut self, username: &str) -> ValidationResult<()> {
        self.username =
            validate_bounded_text(AUTHOR_USERNAME_FIELD, username, AUTHOR_USERNAME_MAX_CHARS)?;
        Ok(())
    }
}
