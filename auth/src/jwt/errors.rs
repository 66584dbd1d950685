use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Missing or invalid authorization header")]
    InvalidAuthHeader,

    #[error("Invalid signing method: {0}")]
    InvalidSigningMethod(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    ExpiredToken,
}
