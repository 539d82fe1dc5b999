//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

use crate::domain::repository::{StoreError, UniqueKey};
use crate::domain::value_object::{EmailError, PersonNameError, UserNameError};

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed request; nothing was read from or written to the store
    #[error("{0}")]
    InvalidInput(String),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Credential store error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) => ErrorKind::BadRequest,
            AuthError::UsernameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::Store(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message shown to clients
    ///
    /// Server-side faults get a generic message; details go to the log.
    fn public_message(&self) -> String {
        match self {
            AuthError::Store(_) | AuthError::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    /// Log, then convert to an AppError carrying the request path
    pub fn into_app_error_at(self, path: &str) -> AppError {
        self.log(path);
        self.to_app_error().with_path(path.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self, path: &str) {
        match self {
            AuthError::Store(e) => {
                tracing::error!(error = %e, path, "Auth credential store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, path, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!(path, "Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, path, "Auth error");
            }
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(UniqueKey::Username) => AuthError::UsernameTaken,
            StoreError::DuplicateKey(UniqueKey::Email) => AuthError::EmailTaken,
            other => AuthError::Store(other),
        }
    }
}

impl From<UserNameError> for AuthError {
    fn from(err: UserNameError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<EmailError> for AuthError {
    fn from(err: EmailError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<PersonNameError> for AuthError {
    fn from(err: PersonNameError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
