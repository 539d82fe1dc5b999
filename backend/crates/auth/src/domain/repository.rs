//! Credential Store Port
//!
//! Interface for account persistence. Implementations live in the
//! infrastructure layer.
//!
//! `insert` is the only place uniqueness is decided. Lookups before an
//! insert are a fast path for the common case; two concurrent
//! registrations can both pass them, and the store must reject the second
//! insert with [`StoreError::DuplicateKey`].

use std::fmt;

use thiserror::Error;

use crate::domain::entity::account::Account;
use crate::domain::value_object::{email::Email, user_name::UserName};

/// A key that must be unique across all accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Username,
    Email,
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueKey::Username => f.write_str("username"),
            UniqueKey::Email => f.write_str("email"),
        }
    }
}

/// Failures reported by a credential store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert collided with an existing account
    #[error("Duplicate {0}")]
    DuplicateKey(UniqueKey),

    /// Connectivity, query or any constraint unrelated to the unique keys
    #[error("Credential store failure: {0}")]
    Backend(String),
}

/// Credential store trait
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Find an account by the canonical form of its user name
    async fn find_by_username(&self, user_name: &UserName) -> Result<Option<Account>, StoreError>;

    /// Find an account by (lowercase) email
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError>;

    /// Persist a new account
    ///
    /// Visible to every lookup issued after this returns `Ok`.
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;
}
