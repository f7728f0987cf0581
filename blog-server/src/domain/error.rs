use blog_core::query::UnknownSortMode;
use blog_core::{CommentError, LikeError, StorageError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn to_status_code(&self) -> u16 {
        match self {
            Self::PostNotFound | Self::CategoryNotFound | Self::CommentNotFound => 404,
            Self::Forbidden(_) => 403,
            Self::ValidationError(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Conflict(_) => 409,
            Self::StorageError(_) | Self::InternalError(_) => 500,
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<UnknownSortMode> for DomainError {
    fn from(err: UnknownSortMode) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<CommentError> for DomainError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::NotFound(_) => Self::CommentNotFound,
            CommentError::Storage(e) => e.into(),
        }
    }
}

impl From<LikeError> for DomainError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::InProgress { .. } => Self::Conflict(err.to_string()),
            LikeError::Storage(e) => e.into(),
        }
    }
}
