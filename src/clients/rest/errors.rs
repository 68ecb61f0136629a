//! REST-specific error types for the Kloudless client.

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for REST client operations.
///
/// ```rust
/// use kloudless::clients::rest::RestError;
///
/// let error = RestError::InvalidPath { path: "".to_string() };
/// assert_eq!(error.to_string(), "Invalid REST API path: ");
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The path is empty after normalization.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}
