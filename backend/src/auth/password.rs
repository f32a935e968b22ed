//! Password hashing
//!
//! New hashes are Argon2id PHC strings. Verification reads the scheme tag
//! from the stored string, so bcrypt hashes written by the previous
//! deployment still verify until the user's record is rewritten.
//!
//! # Performance Considerations
//!
//! Both schemes are intentionally CPU-intensive. Request handlers use the
//! `_async` variants, which run on the blocking thread pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::warn;

/// Hash schemes recognised in stored hash strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// Current scheme for new hashes
    Argon2,
    /// Deprecated; verify only
    Bcrypt,
}

impl HashScheme {
    /// Identify the scheme from the hash string's leading tag
    pub fn detect(hash: &str) -> Option<Self> {
        const ARGON2_TAGS: [&str; 3] = ["$argon2id$", "$argon2i$", "$argon2d$"];
        const BCRYPT_TAGS: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

        if ARGON2_TAGS.iter().any(|tag| hash.starts_with(tag)) {
            Some(HashScheme::Argon2)
        } else if BCRYPT_TAGS.iter().any(|tag| hash.starts_with(tag)) {
            Some(HashScheme::Bcrypt)
        } else {
            None
        }
    }

    pub fn is_deprecated(&self) -> bool {
        !matches!(self, HashScheme::Argon2)
    }
}

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a fresh random salt (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Malformed or unrecognised hashes never error, they simply fail to verify.
    pub fn verify(password: &str, hash: &str) -> bool {
        match HashScheme::detect(hash) {
            Some(HashScheme::Argon2) => match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
            Some(HashScheme::Bcrypt) => bcrypt::verify(password, hash).unwrap_or(false),
            None => false,
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> bool {
        match tokio::task::spawn_blocking(move || Self::verify(&password, &hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Whether a stored hash should be replaced with a current-scheme hash
    pub fn needs_rehash(hash: &str) -> bool {
        HashScheme::detect(hash).map_or(true, |scheme| scheme.is_deprecated())
    }
}
