use blog_core::auth_error::{classify, AuthError, RawAuthError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogClientError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Ошибки, пришедшие от сервера
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },
}

impl BlogClientError {
    /// Maps a non-success response onto the matching variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => Self::InvalidRequest(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::ServerError { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::ServerError { status, .. } => Some(*status),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogClientError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BlogClientError::Unauthorized(_))
    }

    /// The shape the auth-error classifier understands.
    pub fn to_raw_auth_error(&self) -> RawAuthError {
        match self {
            Self::HttpError(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                RawAuthError::Exception {
                    message: format!("network request failed: {}", e),
                }
            }
            Self::HttpError(e) => match e.status() {
                Some(status) => RawAuthError::HttpStatus(status.as_u16()),
                None => RawAuthError::Exception {
                    message: e.to_string(),
                },
            },
            other => match other.status() {
                Some(status) => RawAuthError::HttpStatus(status),
                None => RawAuthError::Unknown,
            },
        }
    }

    /// User-facing description of this failure.
    pub fn to_auth_error(&self) -> AuthError {
        classify(&self.to_raw_auth_error())
    }
}
