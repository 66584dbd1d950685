use thiserror::Error;

/// Error type for secret hashing.
#[derive(Debug, Clone, Error)]
pub enum HashingError {
    #[error("Invalid hashing parameters: {0}")]
    InvalidParameters(String),

    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),
}
