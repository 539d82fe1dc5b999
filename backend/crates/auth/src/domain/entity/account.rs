//! Account Entity
//!
//! One registered user. Created only by a successful registration and
//! never updated afterwards, so there are no setters.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use serde::Serialize;

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_name::UserName, user_password::UserPassword,
};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Unique (case-insensitively) and immutable
    pub user_name: UserName,
    /// Unique, lowercase
    pub email: Email,
    /// Argon2id PHC string, never the plaintext
    pub password_hash: UserPassword,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        user_name: UserName,
        email: Email,
        password_hash: UserPassword,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Self {
        Self {
            account_id: AccountId::new(),
            user_name,
            email,
            password_hash,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }

    /// The only account data ever handed back to callers
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            username: self.user_name.original().to_string(),
            email: self.email.as_str().to_string(),
        }
    }
}

/// Username and email of an account, returned on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub username: String,
    pub email: String,
}
