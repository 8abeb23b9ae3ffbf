//! Shared field validators used by entity constructors and setters.
//!
//! # Responsibility
//! - Normalize raw caller input into the canonical value stored on an entity.
//! - Report exactly which field failed and which rule it broke.
//!
//! # Invariants
//! - No I/O and no logging; the only outside input is the clock, read when a
//!   timestamp is omitted.
//! - Validating an already-normalized value returns it unchanged.
//! - Timestamps leave this module in UTC with microsecond precision, which is
//!   the precision the `tweet` table stores.

use argon2::password_hash::PasswordHash;
use argon2::Algorithm;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use email_address::EmailAddress;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Storage format for timestamps (`YYYY-MM-DD HH:MM:SS.ffffff`).
pub const DB_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const URL_PUNCTUATION: &str = "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=";

static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Za-z/!?][^<>]*>").expect("valid markup tag regex"));

/// Fixed set of failure kinds surfaced by validation and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentifier,
    EmptyOrUnsafeInput,
    ValueTooLong,
    InvalidFormat,
    WrongLength,
    InvalidDate,
    Persistence,
}

/// Field-level validation failure.
///
/// `field` always carries the column name of the offending field so callers
/// can map the failure back to their own input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input is not a well-formed UUID in any accepted representation.
    InvalidIdentifier { field: &'static str, input: String },
    /// Input is empty after trimming and sanitization.
    EmptyOrUnsafeInput { field: &'static str },
    /// Input is longer than the field allows, in characters.
    ValueTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Input does not match the grammar the field requires.
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },
    /// Input must have an exact length and does not.
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Input cannot be read as a real point in time.
    InvalidDate { field: &'static str, input: String },
}

impl ValidationError {
    /// Returns the tagged kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::EmptyOrUnsafeInput { .. } => ErrorKind::EmptyOrUnsafeInput,
            Self::ValueTooLong { .. } => ErrorKind::ValueTooLong,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::WrongLength { .. } => ErrorKind::WrongLength,
            Self::InvalidDate { .. } => ErrorKind::InvalidDate,
        }
    }

    /// Returns the column name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { field, .. }
            | Self::EmptyOrUnsafeInput { field }
            | Self::ValueTooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::WrongLength { field, .. }
            | Self::InvalidDate { field, .. } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { field, input } => {
                write!(f, "{field} is not a valid uuid: `{input}`")
            }
            Self::EmptyOrUnsafeInput { field } => write!(f, "{field} is empty or insecure"),
            Self::ValueTooLong { field, max, actual } => {
                write!(f, "{field} is too long ({actual} > {max} characters)")
            }
            Self::InvalidFormat { field, expected } => {
                write!(f, "{field} is not a valid {expected}")
            }
            Self::WrongLength {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{field} must be exactly {expected} characters, got {actual}"
            ),
            Self::InvalidDate { field, input } => {
                write!(f, "{field} is not a valid date: `{input}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accepted representations of a UUID value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdInput<'a> {
    /// Already parsed.
    Uuid(Uuid),
    /// Textual form (hyphenated, simple, braced or urn).
    Text(&'a str),
    /// Raw 16-byte form, as stored in the database.
    Bytes(&'a [u8]),
}

impl From<Uuid> for IdInput<'_> {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl<'a> From<&'a Uuid> for IdInput<'a> {
    fn from(value: &'a Uuid) -> Self {
        Self::Uuid(*value)
    }
}

impl<'a> From<&'a str> for IdInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for IdInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for IdInput<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(value)
    }
}

impl<'a> From<&'a [u8; 16]> for IdInput<'a> {
    fn from(value: &'a [u8; 16]) -> Self {
        Self::Bytes(value.as_slice())
    }
}

impl<'a> From<&'a Vec<u8>> for IdInput<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Self::Bytes(value.as_slice())
    }
}

/// Accepted representations of a timestamp value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    At(DateTime<Utc>),
    /// Interpreted as UTC.
    Naive(NaiveDateTime),
    Text(String),
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::At(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Resolves any accepted UUID representation into a `Uuid`.
///
/// # Errors
/// - `InvalidIdentifier` when text does not parse or bytes are not 16 long.
pub fn validate_uuid<'a>(
    field: &'static str,
    input: impl Into<IdInput<'a>>,
) -> ValidationResult<Uuid> {
    match input.into() {
        IdInput::Uuid(value) => Ok(value),
        IdInput::Text(text) => {
            Uuid::parse_str(text.trim()).map_err(|_| ValidationError::InvalidIdentifier {
                field,
                input: text.to_string(),
            })
        }
        IdInput::Bytes(bytes) => {
            Uuid::from_slice(bytes).map_err(|_| ValidationError::InvalidIdentifier {
                field,
                input: format!("<{} bytes>", bytes.len()),
            })
        }
    }
}

/// Trims input and removes markup tags and control characters.
///
/// Only tag-shaped runs (`<b>`, `</p>`, `<!-- -->`) are markup; a bare `<` or
/// `>` in prose is kept. Line breaks and tabs inside the text are kept.
pub fn sanitize_text(raw: &str) -> String {
    let mut text = raw
        .chars()
        .filter(|ch| !ch.is_control() || *ch == '\n' || *ch == '\t')
        .collect::<String>();

    // Stripping can expose a new tag, as in `<<b>b>`.
    loop {
        let stripped = match MARKUP_TAG_RE.replace_all(&text, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(stripped) => stripped,
        };
        text = stripped;
    }

    text.trim().to_string()
}

/// Validates required free text bounded by `max` characters.
///
/// # Errors
/// - `EmptyOrUnsafeInput` when nothing remains after [`sanitize_text`].
/// - `ValueTooLong` when the sanitized text exceeds `max` characters.
pub fn validate_bounded_text(
    field: &'static str,
    raw: &str,
    max: usize,
) -> ValidationResult<String> {
    let sanitized = sanitize_text(raw);
    if sanitized.is_empty() {
        return Err(ValidationError::EmptyOrUnsafeInput { field });
    }
    ensure_max_chars(field, &sanitized, max)?;
    Ok(sanitized)
}

/// Validates a nullable URL. `None` is kept as `None`.
///
/// Characters that can never appear in a URL are dropped before the checks.
pub fn validate_optional_url(
    field: &'static str,
    raw: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let sanitized = raw
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || URL_PUNCTUATION.contains(*ch))
        .collect::<String>();
    if sanitized.is_empty() {
        return Err(ValidationError::EmptyOrUnsafeInput { field });
    }
    ensure_max_chars(field, &sanitized, max)?;
    Ok(Some(sanitized))
}

/// Validates an email address.
///
/// # Errors
/// - `EmptyOrUnsafeInput` for blank input.
/// - `InvalidFormat` when the address does not follow the email grammar.
/// - `ValueTooLong` when the address exceeds `max` characters.
pub fn validate_email(field: &'static str, raw: &str, max: usize) -> ValidationResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyOrUnsafeInput { field });
    }
    if !EmailAddress::is_valid(trimmed) {
        return Err(ValidationError::InvalidFormat {
            field,
            expected: "email address",
        });
    }
    ensure_max_chars(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Validates a nullable hexadecimal token of exact length `len`.
///
/// Input is trimmed and lower-cased; an empty string is not hex.
pub fn validate_hex_token(
    field: &'static str,
    raw: Option<&str>,
    len: usize,
) -> ValidationResult<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidFormat {
            field,
            expected: "hexadecimal string",
        });
    }
    ensure_exact_chars(field, &normalized, len)?;
    Ok(Some(normalized))
}

/// Validates an encoded argon2id password hash of exact length `len`.
///
/// The hash is never verified against a password here; only its encoding is
/// checked.
pub fn validate_password_hash(
    field: &'static str,
    raw: &str,
    len: usize,
) -> ValidationResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyOrUnsafeInput { field });
    }

    let invalid = ValidationError::InvalidFormat {
        field,
        expected: "argon2id hash",
    };
    let parsed = PasswordHash::new(trimmed).map_err(|_| invalid.clone())?;
    if !matches!(Algorithm::try_from(parsed.algorithm), Ok(Algorithm::Argon2id)) {
        return Err(invalid);
    }

    ensure_exact_chars(field, trimmed, len)?;
    Ok(trimmed.to_string())
}

/// Resolves a timestamp input. `None` means "now".
///
/// Accepted text forms: `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`,
/// RFC 3339 with an offset, and a bare `YYYY-MM-DD` (midnight UTC).
///
/// # Errors
/// - `InvalidDate` when text matches none of the forms or names a calendar
///   date that does not exist.
pub fn validate_date(
    field: &'static str,
    input: Option<DateInput>,
) -> ValidationResult<DateTime<Utc>> {
    let resolved = match input {
        None => Utc::now(),
        Some(DateInput::At(value)) => value,
        Some(DateInput::Naive(value)) => Utc.from_utc_datetime(&value),
        Some(DateInput::Text(text)) => {
            parse_date_text(&text).ok_or(ValidationError::InvalidDate { field, input: text })?
        }
    };

    Ok(resolved.trunc_subsecs(6))
}

/// Renders a timestamp in the storage format.
pub fn format_db_date(value: &DateTime<Utc>) -> String {
    value.format(DB_DATE_FORMAT).to_string()
}

/// Escapes `LIKE` wildcards so they match literally under `ESCAPE '\'`.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&parsed));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

fn ensure_max_chars(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::ValueTooLong { field, max, actual });
    }
    Ok(())
}

fn ensure_exact_chars(field: &'static str, value: &str, expected: usize) -> ValidationResult<()> {
    let actual = value.chars().count();
    if actual != expected {
        return Err(ValidationError::WrongLength {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
