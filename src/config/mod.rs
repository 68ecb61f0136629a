//! Configuration types for the Kloudless client.
//!
//! # Overview
//!
//! - [`KloudlessConfig`]: all settings needed to talk to the API
//! - [`KloudlessConfigBuilder`]: a builder for [`KloudlessConfig`]
//! - [`Credentials`]: an application API key or a per-account bearer token
//! - [`FieldAccess`]: how resource proxies treat reads of absent fields
//! - [`ApiKey`], [`BearerToken`], [`AccountId`], [`BaseUrl`]: validated newtypes
//! - [`ApiVersion`]: the API path prefix
//!
//! # Example
//!
//! ```rust
//! use kloudless::{AccountId, ApiKey, KloudlessConfig};
//!
//! let config = KloudlessConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .account_id(AccountId::new("832496").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.kloudless.com");
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccountId, ApiKey, BaseUrl, BearerToken};
pub use version::ApiVersion;

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

/// Environment variable holding the application API key.
pub const ENV_API_KEY: &str = "KLOUDLESS_API_KEY";
/// Environment variable holding a per-account bearer token.
pub const ENV_BEARER_TOKEN: &str = "KLOUDLESS_BEARER_TOKEN";
/// Environment variable overriding the API host.
pub const ENV_BASE_URL: &str = "KLOUDLESS_BASE_URL";
/// Environment variable overriding the API version prefix.
pub const ENV_API_VERSION: &str = "KLOUDLESS_API_VERSION";
/// Environment variable holding the default account id.
pub const ENV_ACCOUNT_ID: &str = "KLOUDLESS_ACCOUNT_ID";

/// Credentials sent with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// Application-wide key, sent as `Authorization: APIKey <key>`.
    ApiKey(ApiKey),
    /// Account-scoped OAuth token, sent as `Authorization: Bearer <token>`.
    Bearer(BearerToken),
}

impl Credentials {
    /// Returns the value of the `Authorization` header for these credentials.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        match self {
            Self::ApiKey(key) => format!("APIKey {}", key.as_ref()),
            Self::Bearer(token) => format!("Bearer {}", token.as_ref()),
        }
    }
}

/// How a resource proxy answers a read of a field the server never sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldAccess {
    /// Absent fields read as JSON `null`.
    #[default]
    Lenient,
    /// Absent fields fail with `ResourceError::UnknownField`.
    Strict,
}

/// Configuration for the Kloudless client.
///
/// `KloudlessConfig` is `Clone`, `Send` and `Sync`. It is passed explicitly to
/// [`Kloudless::new`](crate::Kloudless::new); there is no global default key.
#[derive(Clone, Debug)]
pub struct KloudlessConfig {
    credentials: Credentials,
    base_url: BaseUrl,
    api_version: ApiVersion,
    account_id: Option<AccountId>,
    field_access: FieldAccess,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl KloudlessConfig {
    /// Creates a new builder for constructing a `KloudlessConfig`.
    #[must_use]
    pub fn builder() -> KloudlessConfigBuilder {
        KloudlessConfigBuilder::new()
    }

    /// Builds a configuration from `KLOUDLESS_*` environment variables.
    ///
    /// `KLOUDLESS_API_KEY` takes precedence over `KLOUDLESS_BEARER_TOKEN`.
    /// `KLOUDLESS_BASE_URL`, `KLOUDLESS_API_VERSION` and
    /// `KLOUDLESS_ACCOUNT_ID` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if neither credential
    /// variable is set, or the validation error of whichever value is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(key) = lookup(ENV_API_KEY) {
            builder = builder.api_key(ApiKey::new(key)?);
        } else if let Some(token) = lookup(ENV_BEARER_TOKEN) {
            builder = builder.bearer_token(BearerToken::new(token)?);
        }

        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(BaseUrl::new(url)?);
        }

        if let Some(version) = lookup(ENV_API_VERSION) {
            builder = builder.api_version(version.parse()?);
        }

        if let Some(account) = lookup(ENV_ACCOUNT_ID) {
            let account = AccountId::new(account).map_err(|e| ConfigError::InvalidEnvironment {
                name: ENV_ACCOUNT_ID,
                reason: e.to_string(),
            })?;
            builder = builder.account_id(account);
        }

        builder.build()
    }

    /// Returns the request credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API key, if the configuration uses one.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        match &self.credentials {
            Credentials::ApiKey(key) => Some(key),
            Credentials::Bearer(_) => None,
        }
    }

    /// Returns the API host.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the default account id, if configured.
    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    /// Returns the field access mode for resource proxies.
    #[must_use]
    pub const fn field_access(&self) -> FieldAccess {
        self.field_access
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the transport timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<KloudlessConfig>();
};

/// Builder for constructing [`KloudlessConfig`] instances.
///
/// Either `api_key` or `bearer_token` is required; setting one replaces the
/// other.
///
/// # Defaults
///
/// - `base_url`: `https://api.kloudless.com`
/// - `api_version`: `v1`
/// - `account_id`: `None`
/// - `field_access`: [`FieldAccess::Lenient`]
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None`
#[derive(Debug, Default)]
pub struct KloudlessConfigBuilder {
    credentials: Option<Credentials>,
    base_url: Option<BaseUrl>,
    api_version: Option<ApiVersion>,
    account_id: Option<AccountId>,
    field_access: Option<FieldAccess>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl KloudlessConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticates with an application API key.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.credentials = Some(Credentials::ApiKey(key));
        self
    }

    /// Authenticates with an account bearer token.
    #[must_use]
    pub fn bearer_token(mut self, token: BearerToken) -> Self {
        self.credentials = Some(Credentials::Bearer(token));
        self
    }

    /// Sets the API host.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the default account.
    #[must_use]
    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Sets how proxies treat reads of absent fields.
    #[must_use]
    pub const fn field_access(mut self, access: FieldAccess) -> Self {
        self.field_access = Some(access);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the transport timeout applied to every request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`KloudlessConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] with field `credentials`
    /// if neither an API key nor a bearer token was set.
    pub fn build(self) -> Result<KloudlessConfig, ConfigError> {
        let credentials = self.credentials.ok_or(ConfigError::MissingRequiredField {
            field: "credentials",
        })?;

        Ok(KloudlessConfig {
            credentials,
            base_url: self.base_url.unwrap_or_default(),
            api_version: self.api_version.unwrap_or_default(),
            account_id: self.account_id,
            field_access: self.field_access.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
        })
    }
}
