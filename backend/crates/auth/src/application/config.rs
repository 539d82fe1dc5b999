//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::password::{PasswordHashError, PasswordHasher};

/// Re-export so callers can build a cost without depending on `platform`
pub use platform::password::HashCost;

/// Auth application configuration
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Argon2id cost for new hashes
    pub hash_cost: HashCost,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    /// Cheapest hashing cost. Never use in production.
    pub fn development() -> Self {
        Self {
            hash_cost: HashCost::minimal(),
            ..Self::default()
        }
    }

    pub fn with_hash_cost(mut self, cost: HashCost) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Build the hasher used for both registration and login
    pub fn password_hasher(&self) -> Result<PasswordHasher, PasswordHashError> {
        PasswordHasher::new(self.hash_cost, self.password_pepper.clone())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("hash_cost", &self.hash_cost)
            .field("password_pepper", &self.pepper().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_owasp_baseline() {
        let config = AuthConfig::default();
        assert_eq!(config.hash_cost, HashCost::default());
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_builders() {
        let config = AuthConfig::development().with_pepper(b"pepper".to_vec());
        assert_eq!(config.hash_cost, HashCost::minimal());
        assert_eq!(config.pepper(), Some(&b"pepper"[..]));
        assert!(config.password_hasher().is_ok());
    }

    #[test]
    fn test_debug_redacts_pepper() {
        let config = AuthConfig::development().with_pepper(b"hunter2".to_vec());
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
    }
}
