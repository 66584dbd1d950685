use thiserror::Error;

use crate::domain::errors::StorageError;
use crate::domain::transaction::TransactionalError;

/// Error for PostId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for PostTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostTitleError {
    #[error("Post title cannot be empty")]
    Empty,

    #[error("Post title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for PostContent validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostContentError {
    #[error("Post content cannot be empty")]
    Empty,
}

/// Error for TagName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagNameError {
    #[error("Tag name cannot be empty")]
    Empty,

    #[error("Tag name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for post operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid post ID: {0}")]
    InvalidPostId(#[from] PostIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] PostTitleError),

    #[error("Invalid content: {0}")]
    InvalidContent(#[from] PostContentError),

    #[error("Invalid tag: {0}")]
    InvalidTag(#[from] TagNameError),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    #[error("Not allowed to modify post: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Rollback failed ({rollback}) after: {original}")]
    RollbackFailed {
        original: Box<PostError>,
        rollback: StorageError,
    },
}

impl TransactionalError for PostError {
    fn rollback_failed(self, rollback: StorageError) -> Self {
        PostError::RollbackFailed {
            original: Box::new(self),
            rollback,
        }
    }
}
