//! Configuration error types for the Kloudless client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that bad
//! credentials or URLs are rejected before any request is sent.
//!
//! # Example
//!
//! ```rust
//! use kloudless::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building a [`KloudlessConfig`](crate::KloudlessConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Kloudless API key.")]
    EmptyApiKey,

    /// Bearer token cannot be empty.
    #[error("Bearer token cannot be empty. Please provide a valid Kloudless access token.")]
    EmptyBearerToken,

    /// Account ID cannot be empty.
    #[error("Account ID cannot be empty.")]
    EmptyAccountId,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Expected an http(s) URL such as 'https://api.kloudless.com'.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'v1', 'v2', ...")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// An environment variable could not be used.
    #[error("Invalid environment variable {name}: {reason}")]
    InvalidEnvironment {
        /// The variable name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
