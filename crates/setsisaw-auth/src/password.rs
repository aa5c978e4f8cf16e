//! Password hashing with Argon2id.
//!
//! Provides password hashing and verification using Argon2id with
//! OWASP-recommended parameters.

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::sync::OnceLock;

/// Input hashed once to produce the decoy hash used for unknown accounts.
const DECOY_PASSWORD: &str = "setsisaw-decoy-password";

/// Password hasher configuration.
///
/// Uses OWASP 2024 recommended parameters for Argon2id:
/// - Memory: 19456 KiB (19 MiB)
/// - Iterations: 2
/// - Parallelism: 1
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    decoy: OnceLock<Option<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    /// Create a new password hasher with OWASP-recommended parameters.
    #[must_use]
    pub fn new() -> Self {
        // argon2's defaults are the OWASP 2024 set: m=19456, t=2, p=1
        Self {
            params: Params::DEFAULT,
            decoy: OnceLock::new(),
        }
    }

    /// Create a password hasher with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if parameters are invalid.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Internal(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            params,
            decoy: OnceLock::new(),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password, returning a PHC-formatted string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("Hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash.
    ///
    /// A stored hash that cannot be parsed is logged and counts as a
    /// mismatch, so callers see one outcome for every kind of failure.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not valid PHC");
                return false;
            }
        };

        // Parameters come from the hash itself, so hashes made with other
        // settings still verify.
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Compute the decoy hash now instead of on the first unknown-user check.
    ///
    /// Idempotent. A hashing failure is logged and leaves the decoy empty.
    pub fn prepare_decoy(&self) {
        self.decoy();
    }

    fn decoy(&self) -> Option<&str> {
        self.decoy
            .get_or_init(|| {
                self.hash(DECOY_PASSWORD)
                    .inspect_err(|e| tracing::error!(error = %e, "Failed to build decoy hash"))
                    .ok()
            })
            .as_deref()
    }

    #[cfg(test)]
    pub(crate) fn decoy_ready(&self) -> bool {
        matches!(self.decoy.get(), Some(Some(_)))
    }

    /// Burn the same work as [`Self::verify`] when there is no stored hash.
    ///
    /// Used for unknown usernames so that response time does not reveal
    /// whether an account exists. Always returns `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        if let Some(hash) = self.decoy() {
            let _ = self.verify(password, hash);
        }
        false
    }
}

/// Hash a password using Argon2id with OWASP-recommended parameters.
///
/// This is a convenience function using the default `PasswordHasher`.
///
/// # Example
///
/// ```rust
/// use setsisaw_auth::hash_password;
///
/// let hash = hash_password("my-secure-password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    PasswordHasher::new().hash(password)
}

/// Verify a password against an Argon2id hash.
///
/// ```rust
/// use setsisaw_auth::{hash_password, verify_password};
///
/// let hash = hash_password("my-password").unwrap();
/// assert!(verify_password("my-password", &hash));
/// assert!(!verify_password("wrong-password", &hash));
/// ```
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHasher::new().verify(password, hash)
}
