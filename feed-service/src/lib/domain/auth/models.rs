use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::PasswordError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

/// Plaintext password accepted at registration: at least 8 characters and at
/// most 72 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 72;

    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `TooLong` - More than 72 bytes
    pub fn new(password: String) -> Result<Self, PasswordError> {
        let characters = password.chars().count();
        if characters < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
                actual: characters,
            });
        }
        if password.len() > Self::MAX_LENGTH {
            return Err(PasswordError::TooLong {
                max: Self::MAX_LENGTH,
                actual: password.len(),
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
}

/// Command to exchange credentials for an access token.
///
/// The password is not validated beyond presence: a wrong password and a
/// malformed one must both end up as the same unauthorized outcome.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub Uuid);

impl TokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Confirmation,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Confirmation => "confirmation",
        }
    }
}

/// Stored single-use token. Only the hash of the emailed value is kept.
#[derive(Debug, Clone)]
pub struct Token {
    pub id: TokenId,
    pub token_type: TokenType,
    pub value_hash: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: UserId,
}

/// Signed bearer token returned by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);
