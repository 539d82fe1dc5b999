//! In-Memory Credential Store
//!
//! Process-local store used by tests and by the API binary when no
//! `DATABASE_URL` is configured. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::account::Account;
use crate::domain::repository::{CredentialStore, StoreError, UniqueKey};
use crate::domain::value_object::{email::Email, user_name::UserName};

#[derive(Default)]
struct Accounts {
    /// canonical user name -> account
    by_user_name: HashMap<String, Account>,
    /// email -> canonical user name
    email_index: HashMap<String, String>,
}

/// Thread-safe in-memory credential store
///
/// Clones share the same accounts.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    accounts: Arc<RwLock<Accounts>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_user_name.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, user_name: &UserName) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.by_user_name.get(user_name.canonical()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .email_index
            .get(email.as_str())
            .and_then(|key| accounts.by_user_name.get(key))
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        // Both checks and the insert happen under one write lock
        let mut accounts = self.accounts.write().await;

        let user_key = account.user_name.canonical().to_string();
        if accounts.by_user_name.contains_key(&user_key) {
            return Err(StoreError::DuplicateKey(UniqueKey::Username));
        }

        let email_key = account.email.as_str().to_string();
        if accounts.email_index.contains_key(&email_key) {
            return Err(StoreError::DuplicateKey(UniqueKey::Email));
        }

        accounts.email_index.insert(email_key, user_key.clone());
        accounts.by_user_name.insert(user_key, account.clone());

        tracing::debug!(account_id = %account.account_id, "Account stored in memory");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{person_name::PersonName, user_password::UserPassword};
    use platform::password::{ClearTextPassword, HashCost, PasswordHasher};

    fn account(user_name: &str, email: &str) -> Account {
        let hasher = PasswordHasher::new(HashCost::minimal(), None).unwrap();
        let hash = hasher
            .hash(&ClearTextPassword::for_verification("secret123".to_string()))
            .unwrap();
        Account::new(
            UserName::new(user_name).unwrap(),
            Email::new(email).unwrap(),
            UserPassword::from(hash),
            PersonName::default(),
            PersonName::default(),
        )
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = InMemoryCredentialStore::new();
        store.insert(&account("alice", "alice@x.com")).await.unwrap();

        let by_name = store
            .find_by_username(&UserName::new("ALICE").unwrap())
            .await
            .unwrap()
            .expect("found by user name");
        assert_eq!(by_name.email.as_str(), "alice@x.com");

        let by_email = store
            .find_by_email(&Email::new("Alice@X.com").unwrap())
            .await
            .unwrap()
            .expect("found by email");
        assert_eq!(by_email.user_name.original(), "alice");
    }

    #[tokio::test]
    async fn test_find_missing() {
        let store = InMemoryCredentialStore::new();
        assert!(store.is_empty().await);
        assert!(store
            .find_by_username(&UserName::new("bob").unwrap())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_email(&Email::new("bob@x.com").unwrap())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_name_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(&account("alice", "alice@x.com")).await.unwrap();

        let err = store
            .insert(&account("Alice", "other@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(UniqueKey::Username)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(&account("alice", "alice@x.com")).await.unwrap();

        let err = store
            .insert(&account("bob", "alice@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(UniqueKey::Email)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_only_one_wins() {
        let store = InMemoryCredentialStore::new();
        let first = account("carol", "carol@x.com");
        let second = account("carol", "carol2@x.com");

        let (a, b) = tokio::join!(store.insert(&first), store.insert(&second));

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(store.len().await, 1);
    }
}
