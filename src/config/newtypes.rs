//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction so that a
//! [`KloudlessConfig`](crate::KloudlessConfig) can never hold an empty key
//! or a URL without a scheme.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Kloudless API key.
///
/// API keys grant access to every account connected to an application, so the
/// `Debug` output is masked.
///
/// # Example
///
/// ```rust
/// use kloudless::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{key:?}"), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated OAuth bearer token for a single account.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Creates a new validated bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBearerToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyBearerToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(*****)")
    }
}

/// The identifier of a connected account.
///
/// Kloudless returns account ids as JSON numbers in some places and strings
/// in others; both deserialize into an `AccountId`.
///
/// ```rust
/// use kloudless::AccountId;
///
/// let from_number: AccountId = serde_json::from_str("832496").unwrap();
/// let from_string: AccountId = serde_json::from_str(r#""832496""#).unwrap();
/// assert_eq!(from_number, from_string);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new validated account id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccountId`] if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            return Err(ConfigError::EmptyAccountId);
        }
        Ok(Self(id.to_string()))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Self::new(s).map_err(de::Error::custom),
            serde_json::Value::Number(n) => Self::new(n.to_string()).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected account id string or number, got {other}"
            ))),
        }
    }
}

/// A validated base URL for the API host.
///
/// Only `http` and `https` are accepted. A trailing slash is stripped so that
/// paths can be appended uniformly.
///
/// # Example
///
/// ```rust
/// use kloudless::BaseUrl;
///
/// let url = BaseUrl::new("https://api.kloudless.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.kloudless.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("api.kloudless.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// The public Kloudless API host.
    pub const DEFAULT: &'static str = "https://api.kloudless.com";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no `http`/`https`
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(invalid());
        }

        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);
        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        let host = &self.url[self.host_start..self.host_end];
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT.to_string(),
            scheme_end: 5,
            host_start: 8,
            host_end: Self::DEFAULT.len(),
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty_string() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
        assert!(matches!(ApiKey::new("   "), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_secrets_are_masked_in_debug() {
        let key = ApiKey::new("super-secret-key").unwrap();
        let token = BearerToken::new("super-secret-token").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(*****)");
        assert_eq!(format!("{token:?}"), "BearerToken(*****)");
    }

    #[test]
    fn test_account_id_trims_and_rejects_empty() {
        assert_eq!(AccountId::new(" 42 ").unwrap().as_ref(), "42");
        assert!(matches!(AccountId::new(""), Err(ConfigError::EmptyAccountId)));
        assert_eq!(AccountId::from(7_u64).to_string(), "7");
    }

    #[test]
    fn test_account_id_serializes_as_string() {
        let id = AccountId::new("832496").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""832496""#);
    }

    #[test]
    fn test_account_id_rejects_other_json_types() {
        assert!(serde_json::from_str::<AccountId>("true").is_err());
        assert!(serde_json::from_str::<AccountId>(r#""""#).is_err());
    }

    #[test]
    fn test_base_url_default_matches_constant() {
        let default = BaseUrl::default();
        let parsed = BaseUrl::new(BaseUrl::DEFAULT).unwrap();
        assert_eq!(default, parsed);
        assert_eq!(default.host_name(), Some("api.kloudless.com"));
    }

    #[test]
    fn test_base_url_accepts_local_mock_servers() {
        let url = BaseUrl::new("http://127.0.0.1:40123").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_name(), Some("127.0.0.1"));
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        assert!(BaseUrl::new("api.kloudless.com").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("ftp://api.kloudless.com").is_err());
        assert!(BaseUrl::new("https://:443").is_err());
    }
}
