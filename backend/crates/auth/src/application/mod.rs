//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod credential_service;

// Re-exports
pub use config::AuthConfig;
pub use credential_service::{CredentialService, LoginInput, RegisterInput};
