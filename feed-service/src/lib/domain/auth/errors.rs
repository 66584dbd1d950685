use thiserror::Error;

use crate::domain::auth::email::EmailDeliveryError;
use crate::domain::errors::StorageError;
use crate::domain::transaction::TransactionalError;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::UsernameError;
use crate::domain::user::models::RoleName;

/// Error for Password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for registration and login
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordError),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Default role is not configured: {0}")]
    DefaultRoleMissing(RoleName),

    #[error("Hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Email delivery failed: {0}")]
    EmailDelivery(#[from] EmailDeliveryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Rollback failed ({rollback}) after: {original}")]
    RollbackFailed {
        original: Box<AuthError>,
        rollback: StorageError,
    },
}

impl From<auth::HashingError> for AuthError {
    fn from(err: auth::HashingError) -> Self {
        AuthError::Hashing(err.to_string())
    }
}

impl TransactionalError for AuthError {
    fn rollback_failed(self, rollback: StorageError) -> Self {
        AuthError::RollbackFailed {
            original: Box::new(self),
            rollback,
        }
    }
}
