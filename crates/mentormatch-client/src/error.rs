//! Client-side error type.

use thiserror::Error;

/// Errors surfaced by the API client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the call
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// A protected call was made before logging in
    #[error("No session token; call login first")]
    MissingToken,
}
