//! Infrastructure Layer
//!
//! Credential store adapters.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;
