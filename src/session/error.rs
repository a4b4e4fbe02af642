use crate::{api::ApiError, token::StoreError};
use thiserror::Error;

/// Failures surfaced to the user by session flows. `Display` is the message shown.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{0}")]
    Unauthorized(String),
    #[error("Server unreachable. Please check your connection and try again.")]
    Network(String),
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("Received an invalid authentication token.")]
    InvalidToken,
    #[error("Sign-in response did not include a token.")]
    MissingToken,
    #[error("Unexpected server response: {0}")]
    Parse(String),
    #[error("Could not store credentials: {0}")]
    Store(String),
    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Config(message) => Self::Config(message),
            ApiError::Network(message) => Self::Network(message),
            ApiError::Timeout(_) => Self::Timeout,
            ApiError::Unauthorized(message) => Self::Unauthorized(message),
            ApiError::Http { status, message } => Self::Rejected { status, message },
            ApiError::Parse(message) => Self::Parse(message),
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}
