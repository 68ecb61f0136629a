//! # Kloudless Rust Client
//!
//! An async client for the Kloudless unified cloud storage, team and CRM
//! API.
//!
//! ## Overview
//!
//! - Type-safe configuration via [`KloudlessConfig`] and [`KloudlessConfigBuilder`]
//! - Validated newtypes for credentials, account ids and URLs
//! - A session root, [`Kloudless`], exposing accounts and their collections
//! - Resource proxies with explicit field access and dirty tracking
//! - Lazy, restartable pagination over page-number and cursor listings
//! - A typed error taxonomy mapping HTTP status codes and API error bodies
//! - Webhook signature verification
//!
//! ## Quick Start
//!
//! ```rust
//! use kloudless::{ApiKey, KloudlessConfig};
//!
//! let config = KloudlessConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.kloudless.com");
//! ```
//!
//! ## Working with Resources
//!
//! ```rust,ignore
//! use kloudless::{AccountId, Kloudless, KloudlessConfig};
//! use kloudless::rest::{ListParams, ResourceError};
//!
//! let kloudless = Kloudless::new(&KloudlessConfig::from_env()?)?;
//! let account = kloudless.account(AccountId::new("832496")?);
//!
//! // Upload, rename and download a file
//! let mut file = account.files().upload("test.txt", "root", b"test".to_vec(), false).await?;
//! file.set("name", "renamed test.txt");
//! file.save().await?;
//! assert_eq!(file.contents().await?, b"test");
//!
//! // Page through links two at a time
//! let mut links = account.links().all(ListParams::new().page_size(2)).await?;
//! while let Some(link) = links.next().await? {
//!     println!("{:?}", link.get_str("url"));
//! }
//!
//! // Deleting twice surfaces the backend's 404
//! file.delete(true).await?;
//! assert!(matches!(file.delete(true).await, Err(ResourceError::NotFound { .. })));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (requests, responses, skipped saves)
//! and never installs a subscriber.

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
mod session;
pub mod webhooks;

pub use config::{
    AccountId, ApiKey, ApiVersion, BaseUrl, BearerToken, Credentials, FieldAccess,
    KloudlessConfig, KloudlessConfigBuilder,
};
pub use error::ConfigError;
pub use session::Kloudless;

pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResponseError,
    InvalidHttpRequestError, RequestBody, RestClient, RestError,
};

pub use rest::resources::{Account, File, Folder, Group, LinkParams, User};
pub use rest::{
    ApiError, Collection, CrmObject, ListParams, Page, Pager, Resource, ResourceError,
    ResourceKind,
};
