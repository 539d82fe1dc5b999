//! User Name Value Object
//!
//! The username is the public handle an account logs in with.
//!
//! ## Case policy
//! The spelling given at registration is kept for display (`original`).
//! Uniqueness and lookups use the `canonical` form: NFKC normalized,
//! trimmed and lowercased. `Alice` and `alice` are the same account.
//!
//! ## Invariants (checked on the canonical form)
//! - 3 to 30 characters
//! - ASCII `a-z`, `0-9` and `_ . - +` only
//! - starts and ends with a letter, digit or `_`
//! - no `..`
//! - at least one letter or digit
//! - not a reserved word

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

/// Names that would collide with routes, operators or system accounts
const RESERVED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "superuser",
    "moderator",
    "support",
    "api",
    "auth",
    "login",
    "logout",
    "register",
    "password",
    "account",
    "accounts",
    "null",
    "undefined",
    "anonymous",
    "me",
];

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username cannot be empty")]
    Empty,

    #[error("Username is too short ({length} chars, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Username is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{ch}' at position {position}. Only a-z, 0-9, _, ., -, + are allowed")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Username cannot start with '{ch}'. Must start with a-z, 0-9, or _")]
    InvalidStart { ch: char },

    #[error("Username cannot end with '{ch}'. Must end with a-z, 0-9, or _")]
    InvalidEnd { ch: char },

    #[error("Username cannot contain consecutive dots (..)")]
    ConsecutiveDots,

    #[error("Username must contain at least one letter or digit")]
    NoAlphanumeric,

    #[error("Username cannot contain whitespace")]
    ContainsWhitespace,

    #[error("'{0}' is a reserved username")]
    Reserved(String),
}

/// Validated, normalized user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct UserName {
    /// Trimmed, NFKC normalized input (case preserved)
    original: String,
    /// Lowercase form used for uniqueness
    canonical: String,
}

impl UserName {
    /// Normalize and validate raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = normalize(input.as_ref());
        let canonical = original.to_lowercase();
        validate(&canonical)?;
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Rebuild from a stored value (already validated at registration)
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_lowercase();
        Self {
            original,
            canonical,
        }
    }

    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

fn normalize(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_string()
}

fn validate(canonical: &str) -> Result<(), UserNameError> {
    if canonical.is_empty() {
        return Err(UserNameError::Empty);
    }

    let length = canonical.chars().count();
    if length < USER_NAME_MIN_LENGTH {
        return Err(UserNameError::TooShort {
            length,
            min: USER_NAME_MIN_LENGTH,
        });
    }
    if length > USER_NAME_MAX_LENGTH {
        return Err(UserNameError::TooLong {
            length,
            max: USER_NAME_MAX_LENGTH,
        });
    }

    if canonical.chars().any(char::is_whitespace) {
        return Err(UserNameError::ContainsWhitespace);
    }

    if let Some((position, ch)) = canonical.chars().enumerate().find(|(_, c)| !is_valid_char(*c)) {
        return Err(UserNameError::InvalidCharacter { ch, position });
    }

    // Non-empty was checked above
    if let Some(ch) = canonical.chars().next().filter(|c| !is_valid_edge_char(*c)) {
        return Err(UserNameError::InvalidStart { ch });
    }
    if let Some(ch) = canonical.chars().next_back().filter(|c| !is_valid_edge_char(*c)) {
        return Err(UserNameError::InvalidEnd { ch });
    }

    if canonical.contains("..") {
        return Err(UserNameError::ConsecutiveDots);
    }

    if !canonical.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(UserNameError::NoAlphanumeric);
    }

    if RESERVED_WORDS.contains(&canonical) {
        return Err(UserNameError::Reserved(canonical.to_string()));
    }

    Ok(())
}

#[inline]
fn is_valid_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
}

#[inline]
fn is_valid_edge_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserName")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}
