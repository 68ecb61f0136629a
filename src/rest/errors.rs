//! Resource-level error types.
//!
//! Every failure a caller sees is a [`ResourceError`]. Non-2xx responses are
//! mapped once, in [`ResourceError::from_http_response`]:
//!
//! - **400, 422**: [`ResourceError::Validation`]
//! - **401**: [`ResourceError::Unauthorized`]
//! - **403**: [`ResourceError::Forbidden`]
//! - **404**: [`ResourceError::NotFound`]
//! - **429**: [`ResourceError::RateLimited`]
//! - **anything else**: [`ResourceError::Api`]
//!
//! Each of these carries an [`ApiError`] with the parsed Kloudless error
//! body. Their `Display` output ends in `Error data: {json}` so the status
//! code survives being turned into a string.
//!
//! # Example
//!
//! ```rust,ignore
//! use kloudless::rest::ResourceError;
//!
//! match account.files().retrieve("F1").await {
//!     Ok(file) => println!("Found: {:?}", file.get_str("name")),
//!     Err(ResourceError::NotFound { resource, id, .. }) => {
//!         println!("{resource} {id} is gone");
//!     }
//!     Err(e) if e.is_retryable() => println!("try again later: {e}"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::fmt;

use crate::clients::{HttpError, HttpResponseError, RestError};
use crate::error::ConfigError;
use serde_json::Value;
use thiserror::Error;

/// The parsed error body of a non-2xx Kloudless response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// The HTTP status code.
    pub status: u16,
    /// The Kloudless `error_code`, if present.
    pub error_code: Option<String>,
    /// The human-readable `message`, if present.
    pub message: Option<String>,
    /// The request id from `X-Request-Id` or the body's `id`.
    pub request_id: Option<String>,
    /// The raw error body.
    pub body: Value,
}

impl ApiError {
    /// Builds an `ApiError` from a status code and a response body.
    #[must_use]
    pub fn from_body(status: u16, body: &Value, request_id: Option<&str>) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(String::from);

        Self {
            status,
            error_code: text("error_code"),
            message: text("message").or_else(|| text("raw_body")),
            request_id: request_id.map(String::from).or_else(|| text("id")),
            body: body.clone(),
        }
    }

    /// Returns the error body with `status_code` guaranteed to be present.
    #[must_use]
    pub fn error_data(&self) -> Value {
        let mut data = match &self.body {
            Value::Object(map) => map.clone(),
            Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("body".to_string(), other.clone());
                map
            }
        };
        data.entry("status_code")
            .or_insert_with(|| Value::from(self.status));
        Value::Object(data)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kloudless API error ({})", self.status)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        write!(f, ". Error data: {}", self.error_data())
    }
}

impl std::error::Error for ApiError {}

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Configuration was missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A non-2xx response not covered by a more specific variant.
    #[error(transparent)]
    Api(ApiError),

    /// The resource was not found (HTTP 404).
    #[error("{resource} with id {id} not found. {error}")]
    NotFound {
        /// The kind of resource (e.g., "File").
        resource: &'static str,
        /// The id that was requested, or "unknown" for collection requests.
        id: String,
        /// The parsed error body.
        error: ApiError,
    },

    /// The request parameters were rejected (HTTP 400 or 422).
    #[error("Validation failed. {0}")]
    Validation(ApiError),

    /// The credentials were rejected (HTTP 401).
    #[error("Unauthorized. {0}")]
    Unauthorized(ApiError),

    /// The credentials lack access to the resource (HTTP 403).
    #[error("Forbidden. {0}")]
    Forbidden(ApiError),

    /// Too many requests (HTTP 429).
    #[error("Rate limited. {error}")]
    RateLimited {
        /// Seconds to wait, from the `Retry-After` header.
        retry_after: Option<f64>,
        /// The parsed error body.
        error: ApiError,
    },

    /// A transport-level failure (network error or invalid request).
    #[error(transparent)]
    Http(HttpError),

    /// The REST client rejected the request path.
    #[error(transparent)]
    Rest(RestError),

    /// The resource kind does not support the operation, or the ids it needs
    /// are not available.
    #[error("Cannot resolve path for {resource}::{operation} with provided IDs")]
    PathResolutionFailed {
        /// The kind of resource.
        resource: &'static str,
        /// The operation being attempted.
        operation: &'static str,
    },

    /// The operation needs a server-side id and the resource has none.
    #[error("{resource} has no id; {operation} requires a saved resource")]
    MissingId {
        /// The kind of resource.
        resource: &'static str,
        /// The operation being attempted.
        operation: &'static str,
    },

    /// A strict field read found no such field.
    #[error("{resource} has no field '{field}'")]
    UnknownField {
        /// The kind of resource.
        resource: &'static str,
        /// The field name.
        field: String,
    },

    /// A successful response could not be decoded.
    #[error("Failed to decode {resource} response: {message}")]
    Decode {
        /// The kind of resource.
        resource: &'static str,
        /// What went wrong.
        message: String,
    },
}

impl ResourceError {
    /// Creates a `ResourceError` from a non-2xx status code and body.
    ///
    /// ```rust
    /// use kloudless::rest::ResourceError;
    /// use serde_json::json;
    ///
    /// let error = ResourceError::from_http_response(
    ///     404,
    ///     &json!({"status_code": 404, "error_code": "not_found", "message": "File not found"}),
    ///     "File",
    ///     Some("F1"),
    ///     Some("req-1"),
    /// );
    /// assert!(matches!(error, ResourceError::NotFound { .. }));
    /// assert_eq!(error.status_code(), Some(404));
    /// assert!(error.to_string().contains("Error data: "));
    /// ```
    #[must_use]
    pub fn from_http_response(
        code: u16,
        body: &Value,
        resource: &'static str,
        id: Option<&str>,
        request_id: Option<&str>,
    ) -> Self {
        let error = ApiError::from_body(code, body, request_id);
        match code {
            400 | 422 => Self::Validation(error),
            401 => Self::Unauthorized(error),
            403 => Self::Forbidden(error),
            404 => Self::NotFound {
                resource,
                id: id.unwrap_or("unknown").to_string(),
                error,
            },
            429 => Self::RateLimited {
                retry_after: None,
                error,
            },
            _ => Self::Api(error),
        }
    }

    /// Maps a transport response error, keeping the `Retry-After` hint.
    #[must_use]
    pub fn from_response_error(
        error: &HttpResponseError,
        resource: &'static str,
        id: Option<&str>,
    ) -> Self {
        let mapped = Self::from_http_response(
            error.code,
            &error.body,
            resource,
            id,
            error.error_reference.as_deref(),
        );
        match mapped {
            Self::RateLimited { error: api, .. } => Self::RateLimited {
                retry_after: error.retry_after,
                error: api,
            },
            other => other,
        }
    }

    /// Maps any REST client error for the given resource.
    #[must_use]
    pub fn from_rest(error: RestError, resource: &'static str, id: Option<&str>) -> Self {
        match error {
            RestError::Http(HttpError::Response(e)) => Self::from_response_error(&e, resource, id),
            RestError::Http(other) => Self::Http(other),
            other @ RestError::InvalidPath { .. } => Self::Rest(other),
        }
    }

    /// Returns the parsed API error for any response-derived variant.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e)
            | Self::Validation(e)
            | Self::Unauthorized(e)
            | Self::Forbidden(e)
            | Self::NotFound { error: e, .. }
            | Self::RateLimited { error: e, .. } => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status code for any response-derived variant.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self.api_error() {
            Some(e) => Some(e.status),
            None => None,
        }
    }

    /// Returns the request id if available.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.api_error().and_then(|e| e.request_id.as_deref())
    }

    /// Returns `true` for failures that may succeed if repeated later.
    ///
    /// The client never retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Http(HttpError::Network(e)) => e.is_timeout() || e.is_connect(),
            _ => self.status_code().is_some_and(|code| code >= 500),
        }
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_body(status: u16) -> Value {
        json!({
            "status_code": status,
            "error_code": "some_error",
            "message": "Something went wrong",
            "id": "body-req"
        })
    }

    #[test]
    fn test_status_mapping() {
        let cases: [(u16, fn(&ResourceError) -> bool); 8] = [
            (400, |e| matches!(e, ResourceError::Validation(_))),
            (422, |e| matches!(e, ResourceError::Validation(_))),
            (401, |e| matches!(e, ResourceError::Unauthorized(_))),
            (403, |e| matches!(e, ResourceError::Forbidden(_))),
            (404, |e| matches!(e, ResourceError::NotFound { .. })),
            (429, |e| matches!(e, ResourceError::RateLimited { .. })),
            (500, |e| matches!(e, ResourceError::Api(_))),
            (409, |e| matches!(e, ResourceError::Api(_))),
        ];

        for (code, check) in cases {
            let error = ResourceError::from_http_response(code, &error_body(code), "File", None, None);
            assert!(check(&error), "unexpected variant for {code}: {error:?}");
            assert_eq!(error.status_code(), Some(code));
        }
    }

    #[test]
    fn test_not_found_without_id_uses_unknown() {
        let error = ResourceError::from_http_response(404, &json!({}), "Folder", None, None);
        assert!(matches!(
            error,
            ResourceError::NotFound { ref id, resource: "Folder", .. } if id == "unknown"
        ));
    }

    #[test]
    fn test_display_contains_parseable_error_data() {
        let error =
            ResourceError::from_http_response(404, &error_body(404), "File", Some("F1"), None);
        let message = error.to_string();
        assert!(message.contains("File with id F1 not found"));

        let data = message.split("Error data: ").nth(1).unwrap();
        let parsed: Value = serde_json::from_str(data).unwrap();
        assert_eq!(parsed["status_code"], 404);
    }

    #[test]
    fn test_error_data_adds_missing_status_code() {
        let api = ApiError::from_body(502, &json!({"raw_body": "Bad Gateway"}), None);
        assert_eq!(api.message.as_deref(), Some("Bad Gateway"));
        assert_eq!(api.error_data()["status_code"], 502);
    }

    #[test]
    fn test_request_id_prefers_header_value() {
        let error =
            ResourceError::from_http_response(500, &error_body(500), "File", None, Some("hdr-req"));
        assert_eq!(error.request_id(), Some("hdr-req"));

        let error = ResourceError::from_http_response(500, &error_body(500), "File", None, None);
        assert_eq!(error.request_id(), Some("body-req"));
    }

    #[test]
    fn test_from_rest_keeps_retry_after() {
        let rest = RestError::Http(HttpError::Response(HttpResponseError {
            code: 429,
            message: String::new(),
            error_reference: None,
            retry_after: Some(3.0),
            body: error_body(429),
        }));

        let error = ResourceError::from_rest(rest, "File", None);
        assert!(matches!(
            error,
            ResourceError::RateLimited { retry_after: Some(r), .. } if (r - 3.0).abs() < f64::EPSILON
        ));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_from_rest_keeps_invalid_path() {
        let error = ResourceError::from_rest(
            RestError::InvalidPath {
                path: String::new(),
            },
            "File",
            None,
        );
        assert!(matches!(error, ResourceError::Rest(_)));
        assert_eq!(error.status_code(), None);
    }

    #[test]
    fn test_retryable_hint() {
        let server = ResourceError::from_http_response(503, &json!({}), "File", None, None);
        assert!(server.is_retryable());

        let validation = ResourceError::from_http_response(400, &json!({}), "File", None, None);
        assert!(!validation.is_retryable());

        let local = ResourceError::MissingId {
            resource: "File",
            operation: "delete",
        };
        assert!(!local.is_retryable());
    }

    #[test]
    fn test_config_error_converts() {
        let error: ResourceError = ConfigError::EmptyApiKey.into();
        assert!(matches!(error, ResourceError::Config(ConfigError::EmptyApiKey)));
    }
}
