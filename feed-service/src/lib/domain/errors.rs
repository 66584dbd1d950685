use std::time::Duration;

use thiserror::Error;

/// Failure of a single storage call.
///
/// Repository adapters translate driver errors into this type so workflows
/// can react to constraint violations without knowing the driver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Stored data is invalid: {0}")]
    Corrupted(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StorageError {
    /// Whether this is a unique violation of the named constraint.
    pub fn violates(&self, name: &str) -> bool {
        matches!(self, StorageError::UniqueViolation { constraint } if constraint == name)
    }
}
