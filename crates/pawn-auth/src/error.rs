//! Authentication error types.

use crate::forms::ValidationError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend refused the identifier/secret pair
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The backend rejected a request (duplicate account, bad input)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Non-success status outside the cases above
    #[error("Unexpected response status {status}: {body_summary}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body_summary: String,
    },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Client-side form validation failed
    #[error("Invalid input: {}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    /// Initialization was already started for this provider
    #[error("Authentication already initialized")]
    AlreadyInitialized,

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] pawn_storage::StorageError),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AuthError {
    /// Returns true if this error is transient and the operation can be retried.
    ///
    /// Transient errors are connection failures, timeouts, and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                e.status().is_some_and(|status| status.is_server_error())
            }
            AuthError::UnexpectedStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
