//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::services::session_store::SessionError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backend could not be reached or answered unexpectedly.
    #[error("auth backend error: {0}")]
    Api(#[from] ApiError),

    /// The session could not be written.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// A session record could not be serialized.
    #[error("session encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
