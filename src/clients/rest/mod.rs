//! REST API client for the Kloudless API.
//!
//! [`RestClient`] sits on top of [`HttpClient`](crate::clients::HttpClient)
//! and offers `get`, `post`, `put`, `patch` and `delete` helpers with path
//! normalization. Leading slashes are stripped, so `/accounts/1` and
//! `accounts/1` address the same endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use kloudless::{ApiKey, KloudlessConfig, RestClient};
//!
//! let config = KloudlessConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build()?;
//! let client = RestClient::new(&config)?;
//!
//! let response = client.get("accounts", None).await?;
//! println!("Accounts: {}", response.body);
//! ```

mod client;
mod errors;

pub use client::{Query, RestClient};
pub use errors::RestError;
