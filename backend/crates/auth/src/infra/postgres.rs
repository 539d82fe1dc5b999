//! PostgreSQL Credential Store
//!
//! Uniqueness is enforced by the `accounts` table's unique constraints;
//! a unique violation on insert is reported as the colliding key.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::{CredentialStore, StoreError, UniqueKey};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_name::UserName, user_password::UserPassword,
};

/// Constraint guarding `username_canonical`
pub const USERNAME_CONSTRAINT: &str = "accounts_username_canonical_key";

/// Constraint guarding `email`
pub const EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, user_name: &UserName) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                username,
                email,
                password_hash,
                first_name,
                last_name,
                created_at
            FROM accounts
            WHERE username_canonical = $1
            "#,
        )
        .bind(user_name.canonical())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                username,
                email,
                password_hash,
                first_name,
                last_name,
                created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                username,
                username_canonical,
                email,
                password_hash,
                first_name,
                last_name,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.user_name.original())
        .bind(account.user_name.canonical())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.first_name.as_str())
        .bind(account.last_name.as_str())
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(key) = db_err.constraint().and_then(unique_key_for_constraint) {
                return StoreError::DuplicateKey(key);
            }
        }
    }
    StoreError::Backend(err.to_string())
}

/// Which unique key a violated constraint protects
fn unique_key_for_constraint(constraint: &str) -> Option<UniqueKey> {
    match constraint {
        USERNAME_CONSTRAINT => Some(UniqueKey::Username),
        EMAIL_CONSTRAINT => Some(UniqueKey::Email),
        _ => None,
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, StoreError> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| StoreError::Backend(format!("Invalid password hash: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            user_name: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password_hash,
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_mapping() {
        assert_eq!(
            unique_key_for_constraint(USERNAME_CONSTRAINT),
            Some(UniqueKey::Username)
        );
        assert_eq!(
            unique_key_for_constraint(EMAIL_CONSTRAINT),
            Some(UniqueKey::Email)
        );
        assert_eq!(unique_key_for_constraint("accounts_pkey"), None);
    }

    /// Database error as reported by the driver for a violated constraint
    #[derive(Debug)]
    struct ConstraintViolation {
        unique: bool,
        constraint: &'static str,
    }

    impl std::fmt::Display for ConstraintViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "violates constraint \"{}\"", self.constraint)
        }
    }

    impl std::error::Error for ConstraintViolation {}

    impl sqlx::error::DatabaseError for ConstraintViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::CheckViolation
            }
        }
    }

    fn database_error(unique: bool, constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintViolation { unique, constraint }))
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate_key() {
        assert!(matches!(
            map_sqlx_error(database_error(true, EMAIL_CONSTRAINT)),
            StoreError::DuplicateKey(UniqueKey::Email)
        ));
        assert!(matches!(
            map_sqlx_error(database_error(true, USERNAME_CONSTRAINT)),
            StoreError::DuplicateKey(UniqueKey::Username)
        ));
        assert!(matches!(
            map_sqlx_error(database_error(true, "accounts_pkey")),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn test_other_violations_on_unique_constraints_are_backend() {
        let err = map_sqlx_error(database_error(false, EMAIL_CONSTRAINT));
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_non_database_errors_are_backend() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_row_with_invalid_hash_is_rejected() {
        let row = AccountRow {
            account_id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "secret123".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc::now(),
        };
        assert!(matches!(row.into_account(), Err(StoreError::Backend(_))));
    }
}
