//! Error types for API operations

use postboard_core::http::HttpError;
use postboard_runtime::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No response was received
    Transport,
    /// The server answered with an unexpected status
    Status,
    /// The resource does not exist
    NotFound,
    /// The response could not be interpreted
    MalformedResponse,
    /// The store could not complete the request
    Runtime,
}

/// Errors that can occur when synchronizing with the REST API.
///
/// `Clone` so failures can travel inside completion actions.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// API answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        message: String,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Store shut down or the completion did not arrive in time
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ApiError {
    /// The error's classification
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Status,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Runtime(_) => ErrorKind::Runtime,
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Transport(message) => Self::Transport(message),
            HttpError::Decode(message) => Self::MalformedResponse(message),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self::Runtime(error.to_string())
    }
}
