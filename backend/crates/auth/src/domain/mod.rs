//! Domain Layer
//!
//! Contains entities, value objects, and the credential store port.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Account, AccountSummary};
pub use repository::{CredentialStore, StoreError, UniqueKey};
