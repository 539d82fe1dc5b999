//! Person Name Value Object
//!
//! First and last names are display-only: no uniqueness, may be empty.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of a first or last name (in characters)
pub const PERSON_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonNameError {
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} contains invalid control characters")]
    InvalidCharacter { field: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// `field` names the input in error messages ("First name", "Last name")
    pub fn new(input: impl AsRef<str>, field: &'static str) -> Result<Self, PersonNameError> {
        let name = input.as_ref().nfkc().collect::<String>().trim().to_string();

        if name.chars().count() > PERSON_NAME_MAX_LENGTH {
            return Err(PersonNameError::TooLong {
                field,
                max: PERSON_NAME_MAX_LENGTH,
            });
        }

        if name.chars().any(char::is_control) {
            return Err(PersonNameError::InvalidCharacter { field });
        }

        Ok(Self(name))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
