//! Password Hashing and Verification
//!
//! NIST SP 800-63B oriented password handling:
//! - Argon2id hashing with a configurable cost (memory-hard, OWASP baseline)
//! - Fresh random salt for every hash
//! - Zeroization of clear text and peppered buffers
//! - Constant-time verification (delegated to `argon2`)
//! - Decoy verification for unknown accounts
//! - Offloading of hash/verify work onto tokio's blocking pool
//!
//! Policy checks ([`ClearTextPassword::new`]) are for passwords being set.
//! Passwords presented for verification are only normalized
//! ([`ClearTextPassword::for_verification`]), never rejected by policy.

use std::fmt;
use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, ParamsBuilder, PasswordHash, PasswordHasher as _, PasswordVerifier,
    Version, password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Input hashed once at start-up to produce the decoy hash
const DECOY_INPUT: &[u8] = b"decoy-password-for-unknown-accounts";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Control characters other than space, tab and newline
    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    /// Sequential, repeated, keyboard or dictionary password
    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Argon2 rejected the configured cost parameters
    #[error("Invalid hash cost: {0}")]
    InvalidCost(String),

    /// The blocking task panicked or was cancelled
    #[error("Password hashing task failed: {0}")]
    TaskFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
/// assert_eq!(format!("{password:?}"), "ClearTextPassword(\"[REDACTED]\")");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password that is about to be set, enforcing the policy
    ///
    /// - NFKC normalization first
    /// - 8..=128 Unicode code points
    /// - not blank
    /// - no control characters besides space, tab and newline
    /// - not a trivially common pattern
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Create a password presented at login
    ///
    /// Only normalizes, so that verification sees the same bytes that were
    /// hashed at registration. Never fails.
    pub fn for_verification(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        let normalized = self.0.as_str();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // NIST: count Unicode code points, not bytes
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != ' ' && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string is self-describing: algorithm, version, cost parameters,
/// salt and digest. Verification always uses the parameters stored in the
/// string, so hashes made under an older cost keep verifying.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from a PHC string (e.g. loaded from the database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hash Cost
// ============================================================================

/// Argon2id cost parameters
///
/// Tune at deployment time so one hash takes roughly 100-250 ms on the
/// target hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB (`m`)
    pub memory_kib: u32,
    /// Passes over memory (`t`)
    pub iterations: u32,
    /// Lanes (`p`)
    pub parallelism: u32,
}

impl Default for HashCost {
    /// OWASP baseline: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashCost {
    /// Smallest cost Argon2 accepts. Tests and local development only.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

// ============================================================================
// Password Hasher
// ============================================================================

/// Argon2id hasher bound to one cost and one (optional) pepper
///
/// Cheap to clone; clones share the pepper and decoy hash.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    pepper: Option<Arc<[u8]>>,
    decoy: HashedPassword,
}

impl PasswordHasher {
    /// Build a hasher and precompute its decoy hash
    ///
    /// The decoy is hashed with the same cost as real passwords, so a
    /// decoy verification takes as long as a real one.
    pub fn new(cost: HashCost, pepper: Option<Vec<u8>>) -> Result<Self, PasswordHashError> {
        let params = ParamsBuilder::new()
            .m_cost(cost.memory_kib)
            .t_cost(cost.iterations)
            .p_cost(cost.parallelism)
            .build()
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let pepper: Option<Arc<[u8]>> = pepper.map(Arc::from);

        let decoy = hash_with(&argon2, pepper.as_deref(), DECOY_INPUT)?;

        Ok(Self {
            argon2,
            pepper,
            decoy,
        })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        hash_with(&self.argon2, self.pepper.as_deref(), password.as_bytes())
    }

    /// Verify a password against a stored hash
    ///
    /// Argon2 compares digests in constant time. A malformed hash never
    /// verifies.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let parsed_hash = match PasswordHash::new(&hashed.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let input = peppered(password.as_bytes(), self.pepper.as_deref());

        self.argon2
            .verify_password(input.as_slice(), &parsed_hash)
            .is_ok()
    }

    /// Spend one verification's worth of work and report failure
    ///
    /// Used when the account does not exist, so that the response time does
    /// not reveal whether a username is registered.
    pub fn verify_decoy(&self, password: &ClearTextPassword) -> bool {
        // Result is discarded: a decoy match must never authenticate anyone.
        let _ = self.verify(password, &self.decoy);
        false
    }

    // ========================================================================
    // Blocking-pool offload
    // ========================================================================

    /// [`hash`](Self::hash) on tokio's blocking pool
    pub async fn hash_blocking(
        &self,
        password: ClearTextPassword,
    ) -> Result<HashedPassword, PasswordHashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordHashError::TaskFailed(e.to_string()))?
    }

    /// [`verify`](Self::verify) on tokio's blocking pool
    ///
    /// `None` as the stored hash runs a decoy verification instead.
    pub async fn verify_blocking(
        &self,
        password: ClearTextPassword,
        hashed: Option<HashedPassword>,
    ) -> Result<bool, PasswordHashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || match hashed {
            Some(hashed) => hasher.verify(&password, &hashed),
            None => hasher.verify_decoy(&password),
        })
        .await
        .map_err(|e| PasswordHashError::TaskFailed(e.to_string()))
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn hash_with(
    argon2: &Argon2<'static>,
    pepper: Option<&[u8]>,
    password: &[u8],
) -> Result<HashedPassword, PasswordHashError> {
    let input = peppered(password, pepper);

    // 128-bit salt, never reused
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(input.as_slice(), &salt)
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

    Ok(HashedPassword {
        hash: hash.to_string(),
    })
}

/// Password bytes followed by the pepper, wiped on drop
fn peppered(password: &[u8], pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
    let mut combined = Zeroizing::new(password.to_vec());
    if let Some(p) = pepper {
        combined.extend_from_slice(p);
    }
    combined
}

/// Check for common weak patterns
fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // All the same character (e.g. "aaaaaaaa")
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &[
        "qwerty",
        "asdfgh",
        "zxcvbn",
        "qazwsx",
        "1qaz2wsx",
    ];

    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein1",
        "welcome1",
        "admin123",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "baseball",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// Only digits, at least four of them, strictly ascending or descending
fn is_sequential_numbers(s: &str) -> bool {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 4 {
        return false;
    }

    let is_ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));

    let is_descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    is_ascending || is_descending
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost::minimal(), None).unwrap()
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        ));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "ab".repeat(MAX_PASSWORD_LENGTH);
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("          ".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::EmptyOrWhitespace)));
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defghij".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_password_common_pattern() {
        for weak in ["password123", "qwertyuiop", "12345678", "87654321", "zzzzzzzz"] {
            let result = ClearTextPassword::new(weak.to_string());
            assert!(
                matches!(result, Err(PasswordPolicyError::CommonPattern)),
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_valid_passwords() {
        assert!(ClearTextPassword::new("secret123".to_string()).is_ok());
        assert!(ClearTextPassword::new("MySecure#Pass2024!".to_string()).is_ok());
        assert!(ClearTextPassword::new("パスワード安全です!".to_string()).is_ok());
    }

    #[test]
    fn test_for_verification_skips_policy() {
        // Too short for the policy, still usable for a login attempt
        let password = ClearTextPassword::for_verification("x".to_string());
        assert_eq!(password.as_bytes(), b"x");
    }

    #[test]
    fn test_nfkc_normalization_matches_on_verify() {
        let h = hasher();
        // Full-width digits normalize to ASCII
        let set = ClearTextPassword::new("secret１２３".to_string()).unwrap();
        let hashed = h.hash(&set).unwrap();

        let login = ClearTextPassword::for_verification("secret123".to_string());
        assert!(h.verify(&login, &hashed));
    }

    #[test]
    fn test_hash_and_verify() {
        let h = hasher();
        let password = ClearTextPassword::for_verification("TestPassword123!".to_string());
        let hashed = h.hash(&password).unwrap();

        assert!(h.verify(&password, &hashed));

        let wrong = ClearTextPassword::for_verification("WrongPassword123!".to_string());
        assert!(!h.verify(&wrong, &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let h = hasher();
        let password = ClearTextPassword::for_verification("secret123".to_string());

        let first = h.hash(&password).unwrap();
        let second = h.hash(&password).unwrap();

        assert_ne!(first.as_phc_string(), second.as_phc_string());
        assert!(h.verify(&password, &first));
        assert!(h.verify(&password, &second));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let h = hasher();
        let password = ClearTextPassword::for_verification("secret123".to_string());
        let hashed = h.hash(&password).unwrap();

        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(!hashed.as_phc_string().contains("secret123"));
    }

    #[test]
    fn test_hash_with_pepper() {
        let peppered = PasswordHasher::new(HashCost::minimal(), Some(b"pepper".to_vec())).unwrap();
        let plain = hasher();
        let password = ClearTextPassword::for_verification("TestPassword123!".to_string());

        let hashed = peppered.hash(&password).unwrap();

        assert!(peppered.verify(&password, &hashed));
        assert!(!plain.verify(&password, &hashed));
    }

    #[test]
    fn test_hash_records_cost() {
        let h = PasswordHasher::new(
            HashCost {
                memory_kib: 16,
                iterations: 2,
                parallelism: 1,
            },
            None,
        )
        .unwrap();
        let password = ClearTextPassword::for_verification("secret123".to_string());
        let hashed = h.hash(&password).unwrap();

        assert!(hashed.as_phc_string().contains("m=16,t=2,p=1"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let result = PasswordHasher::new(
            HashCost {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
            None,
        );
        assert!(matches!(result, Err(PasswordHashError::InvalidCost(_))));
    }

    #[test]
    fn test_decoy_never_verifies() {
        let h = hasher();
        let decoy_input = String::from_utf8(DECOY_INPUT.to_vec()).unwrap();
        let password = ClearTextPassword::for_verification(decoy_input);
        assert!(!h.verify_decoy(&password));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let h = hasher();
        let password = ClearTextPassword::for_verification("TestPassword123!".to_string());
        let hashed = h.hash(&password).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(h.verify(&password, &restored));
    }

    #[test]
    fn test_invalid_phc_string() {
        let result = HashedPassword::from_phc_string("not_a_valid_hash");
        assert!(matches!(result, Err(PasswordHashError::InvalidHashFormat)));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::for_verification("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let h = PasswordHasher::new(HashCost::minimal(), Some(b"pepper".to_vec())).unwrap();
        assert!(format!("{h:?}").contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_blocking_offload() {
        let h = hasher();
        let hashed = h
            .hash_blocking(ClearTextPassword::for_verification("secret123".to_string()))
            .await
            .unwrap();

        let ok = h
            .verify_blocking(
                ClearTextPassword::for_verification("secret123".to_string()),
                Some(hashed.clone()),
            )
            .await
            .unwrap();
        assert!(ok);

        let wrong = h
            .verify_blocking(
                ClearTextPassword::for_verification("wrong".to_string()),
                Some(hashed),
            )
            .await
            .unwrap();
        assert!(!wrong);

        let decoy = h
            .verify_blocking(ClearTextPassword::for_verification("secret123".to_string()), None)
            .await
            .unwrap();
        assert!(!decoy);
    }
}
