//! Credential Service
//!
//! Registration and login. Stateless between calls: every piece of mutable
//! state lives in the credential store.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::{Account, AccountSummary};
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Registration input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Credential service
pub struct CredentialService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    hasher: PasswordHasher,
}

impl<S> Clone for CredentialService<S>
where
    S: CredentialStore,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

impl<S> CredentialService<S>
where
    S: CredentialStore,
{
    /// Fails only if the configured hash cost is rejected by Argon2
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> AuthResult<Self> {
        let hasher = config.password_hasher()?;
        Ok(Self { store, hasher })
    }

    /// Register a new account
    ///
    /// 1. validate user name, email and display names (no store access)
    /// 2. reject a taken user name, then a taken email
    /// 3. apply the password policy and hash off the async runtime
    /// 4. insert; a duplicate-key failure from the store wins over step 2
    pub async fn register(&self, input: RegisterInput) -> AuthResult<AccountSummary> {
        let user_name = UserName::new(&input.user_name)?;
        let email = Email::new(&input.email)?;
        let first_name = PersonName::new(&input.first_name, "First name")?;
        let last_name = PersonName::new(&input.last_name, "Last name")?;

        if self.store.find_by_username(&user_name).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash: UserPassword = self
            .hasher
            .hash_blocking(raw_password.into_inner())
            .await?
            .into();

        let account = Account::new(user_name, email, password_hash, first_name, last_name);

        // The store is the authority on uniqueness: a concurrent registration
        // may have inserted the same key after the lookups above.
        if let Err(err) = self.store.insert(&account).await {
            let err = AuthError::from(err);
            if matches!(err, AuthError::UsernameTaken | AuthError::EmailTaken) {
                tracing::info!(
                    user_name = %account.user_name,
                    error = %err,
                    "Registration lost a uniqueness race"
                );
            }
            return Err(err);
        }

        tracing::info!(
            account_id = %account.account_id,
            user_name = %account.user_name,
            "Account registered"
        );

        Ok(account.summary())
    }

    /// Authenticate a user name and password
    ///
    /// Unknown user names and wrong passwords fail identically, and both
    /// paths run exactly one Argon2 verification.
    pub async fn login(&self, input: LoginInput) -> AuthResult<AccountSummary> {
        let password = RawPassword::for_login(input.password).into_inner();

        // A name that cannot be valid cannot be registered either
        let account = match UserName::new(&input.user_name) {
            Ok(user_name) => self.store.find_by_username(&user_name).await?,
            Err(_) => None,
        };

        let stored_hash = account.as_ref().map(|a| a.password_hash.to_hashed());
        let verified = self.hasher.verify_blocking(password, stored_hash).await?;

        match account {
            Some(account) if verified => {
                tracing::info!(account_id = %account.account_id, "User logged in");
                Ok(account.summary())
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
