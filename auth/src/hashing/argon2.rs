use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::HashingError;

/// Salted one-way hashing for passwords and opaque tokens.
///
/// Uses Argon2id with a fixed work factor. Every call to [`SecretHasher::hash`]
/// draws a fresh salt, so hashing the same input twice yields different strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretHasher;

impl SecretHasher {
    /// Memory cost in KiB.
    const MEMORY_COST_KIB: u32 = 19 * 1024;
    const ITERATIONS: u32 = 2;
    const PARALLELISM: u32 = 1;

    /// Create a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret.
    ///
    /// # Arguments
    /// * `plaintext` - Password or raw token to hash
    ///
    /// # Returns
    /// PHC string (algorithm, parameters, salt and digest)
    ///
    /// # Errors
    /// * `InvalidParameters` - The fixed work factor was rejected
    /// * `HashingFailed` - Salt generation or hashing failed
    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut OsRng);

        Self::argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashingError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext secret against a stored hash.
    ///
    /// The comparison is done by the algorithm's own verifier, which reads the
    /// parameters and salt from the PHC string. A malformed hash never matches.
    pub fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }

    fn argon2() -> Result<Argon2<'static>, HashingError> {
        let params = Params::new(
            Self::MEMORY_COST_KIB,
            Self::ITERATIONS,
            Self::PARALLELISM,
            None,
        )
        .map_err(|e| HashingError::InvalidParameters(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
