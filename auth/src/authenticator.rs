use chrono::Duration;
use chrono::Utc;

use crate::hashing::HashingError;
use crate::hashing::SecretHasher;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Settings for tokens issued by an [`Authenticator`].
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub expiration_hours: i64,
}

/// Authentication coordinator combining secret hashing and JWT handling.
///
/// Issued tokens carry the configured issuer and audience, and only tokens
/// with that issuer and audience pass validation.
pub struct Authenticator {
    hasher: SecretHasher,
    jwt_handler: JwtHandler,
    settings: TokenSettings,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `settings` - Issuer, audience and lifetime of issued tokens
    pub fn new(jwt_secret: &[u8], settings: TokenSettings) -> Self {
        let jwt_handler = JwtHandler::new(jwt_secret)
            .with_issuer(&settings.issuer)
            .with_audience(&settings.audience);

        Self {
            hasher: SecretHasher::new(),
            jwt_handler,
            settings,
        }
    }

    /// Hash a password or raw token for storage.
    pub fn hash_secret(&self, plaintext: &str) -> Result<String, HashingError> {
        self.hasher.hash(plaintext)
    }

    /// Check a plaintext secret against its stored hash.
    pub fn verify_secret(&self, hash: &str, plaintext: &str) -> bool {
        self.hasher.verify(hash, plaintext)
    }

    /// Verify credentials and issue a token for the subject.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to sign once the password matches
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.hasher.verify(stored_hash, password) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Build claims for a subject expiring after the configured number of hours.
    pub fn claims_for(&self, subject: impl ToString, role: impl ToString) -> Claims {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.settings.expiration_hours);

        Claims::new(subject, role, now, expires_at)
            .with_issuer(&self.settings.issuer)
            .with_audience(&self.settings.audience)
    }

    /// Sign claims without password verification.
    pub fn generate_token(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.issue(claims)
    }

    /// Validate an `Authorization: Bearer <token>` header value.
    pub fn validate_header(&self, authorization: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.validate_header(authorization)
    }
}
