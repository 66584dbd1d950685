use thiserror::Error;

use crate::domain::errors::StorageError;
use crate::domain::transaction::TransactionalError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleNameError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Top-level error for user and follow operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Users cannot follow themselves")]
    SelfFollow,

    #[error("Not allowed to modify user: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Rollback failed ({rollback}) after: {original}")]
    RollbackFailed {
        original: Box<UserError>,
        rollback: StorageError,
    },
}

impl TransactionalError for UserError {
    fn rollback_failed(self, rollback: StorageError) -> Self {
        UserError::RollbackFailed {
            original: Box::new(self),
            rollback,
        }
    }
}
