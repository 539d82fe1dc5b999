//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Account entity, value objects, credential store port
//! - `application/` - Credential service and its configuration
//! - `infra/` - PostgreSQL and in-memory credential stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration with first/last name, username, email and password
//! - Login with username + password
//! - Case-insensitive usernames, lowercase emails, both unique
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, fresh salt per hash, optional pepper
//! - Hashing and verification run on tokio's blocking pool
//! - Unknown usernames and wrong passwords are indistinguishable, both in
//!   the response and in the work done to produce it

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, HashCost};
pub use application::credential_service::{CredentialService, LoginInput, RegisterInput};
pub use domain::{Account, AccountSummary, CredentialStore, StoreError, UniqueKey};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryCredentialStore, PgCredentialStore};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
