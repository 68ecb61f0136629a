//! HTTP-specific error types for the Kloudless client.
//!
//! - [`HttpResponseError`]: a non-2xx response from the API
//! - [`InvalidHttpRequestError`]: a request that failed validation before sending
//! - [`HttpError`]: unified error type for the transport layer
//!
//! # Example
//!
//! ```rust,ignore
//! use kloudless::clients::{HttpClient, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// `message` is a compact JSON rendering of the Kloudless error body
/// (`status_code`, `error_code`, `message`, `id`) so it stays readable when
/// printed. The full parsed body is kept in `body`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Request id for error reporting (from the `X-Request-Id` header or body `id`).
    pub error_reference: Option<String>,
    /// Seconds to wait before retrying, from the `Retry-After` header.
    pub retry_after: Option<f64>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

/// Error returned when an HTTP request fails validation.
///
/// Raised before a request is sent, for example when a POST, PUT or PATCH
/// request has no body.
///
/// ```rust
/// use kloudless::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "patch".to_string(),
/// };
/// assert_eq!(error.to_string(), "Cannot use patch without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A header name or value could not be encoded.
    #[error("Invalid header {name}.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_error(code: u16) -> HttpResponseError {
        HttpResponseError {
            code,
            message: r#"{"status_code":404,"message":"Not Found"}"#.to_string(),
            error_reference: Some("abc-123".to_string()),
            retry_after: None,
            body: json!({"status_code": code, "message": "Not Found"}),
        }
    }

    #[test]
    fn test_http_response_error_displays_message() {
        let error = response_error(404);
        assert_eq!(
            error.to_string(),
            r#"{"status_code":404,"message":"Not Found"}"#
        );
        assert_eq!(error.error_reference.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_invalid_header_error() {
        let error = InvalidHttpRequestError::InvalidHeader {
            name: "X-Kloudless-Metadata".to_string(),
        };
        assert!(error.to_string().contains("X-Kloudless-Metadata"));
    }

    #[test]
    fn test_http_error_wraps_variants() {
        let error: HttpError = response_error(500).into();
        assert!(matches!(error, HttpError::Response(ref e) if e.code == 500));

        let error: HttpError = InvalidHttpRequestError::MissingBody {
            method: "post".to_string(),
        }
        .into();
        assert!(error.to_string().contains("post"));
    }
}
