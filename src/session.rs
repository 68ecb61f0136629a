//! The session root.
//!
//! [`Kloudless`] owns the shared [`RestClient`] built from a
//! [`KloudlessConfig`]. Credentials are fixed for its lifetime; every account,
//! collection and resource proxy obtained from it reuses the same client.
//!
//! # Example
//!
//! ```rust
//! use kloudless::{AccountId, ApiKey, Kloudless, KloudlessConfig};
//!
//! let config = KloudlessConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .account_id(AccountId::new("832496").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let kloudless = Kloudless::new(&config).unwrap();
//! let account = kloudless.default_account().unwrap();
//! assert_eq!(account.scope().unwrap().as_ref(), "832496");
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::RestClient;
use crate::config::{AccountId, KloudlessConfig};
use crate::error::ConfigError;
use crate::rest::resources::Account;
use crate::rest::{Collection, Resource, ResourceError, ResourceKind};

/// A Kloudless API session.
#[derive(Debug, Clone)]
pub struct Kloudless {
    client: Arc<RestClient>,
    default_account: Option<AccountId>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Kloudless>();
};

impl Kloudless {
    /// Creates a session from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &KloudlessConfig) -> Result<Self, ResourceError> {
        let client = RestClient::new(config)
            .map_err(|e| ResourceError::from_rest(e, ResourceKind::Account.name(), None))?;
        Ok(Self {
            client: Arc::new(client),
            default_account: config.account_id().cloned(),
        })
    }

    /// Returns the shared REST client.
    #[must_use]
    pub const fn client(&self) -> &Arc<RestClient> {
        &self.client
    }

    /// The accounts connected to the application.
    #[must_use]
    pub fn accounts(&self) -> Collection<Account> {
        Collection::new(Arc::clone(&self.client), ResourceKind::Account, None)
    }

    /// Returns a handle on account `id` without fetching it.
    ///
    /// Its metadata (`service`, `admin`, ...) is empty until
    /// [`refresh`](Resource::refresh) is called.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Account {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(id.to_string()));
        Account::from(Resource::from_server(
            Arc::clone(&self.client),
            ResourceKind::Account,
            None,
            fields,
        ))
    }

    /// Returns a handle on the account configured with
    /// [`KloudlessConfigBuilder::account_id`](crate::KloudlessConfigBuilder::account_id).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if none was configured.
    pub fn default_account(&self) -> Result<Account, ResourceError> {
        self.default_account
            .clone()
            .map(|id| self.account(id))
            .ok_or_else(|| {
                ConfigError::MissingRequiredField {
                    field: "account_id",
                }
                .into()
            })
    }

    /// Fetches account `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the account does not exist.
    pub async fn retrieve_account(&self, id: &AccountId) -> Result<Account, ResourceError> {
        self.accounts().retrieve(id.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    fn config(account: Option<&str>) -> KloudlessConfig {
        let mut builder = KloudlessConfig::builder().api_key(ApiKey::new("key").unwrap());
        if let Some(account) = account {
            builder = builder.account_id(AccountId::new(account).unwrap());
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_account_handle_is_scoped() {
        let kloudless = Kloudless::new(&config(None)).unwrap();
        let account = kloudless.account(AccountId::new("7").unwrap());

        assert_eq!(account.id().as_deref(), Some("7"));
        assert_eq!(account.kind(), ResourceKind::Account);
        assert!(!account.is_dirty());
        assert!(account.service().is_none());
    }

    #[test]
    fn test_default_account_requires_configuration() {
        let kloudless = Kloudless::new(&config(None)).unwrap();
        assert!(matches!(
            kloudless.default_account(),
            Err(ResourceError::Config(ConfigError::MissingRequiredField {
                field: "account_id"
            }))
        ));

        let kloudless = Kloudless::new(&config(Some("99"))).unwrap();
        assert_eq!(
            kloudless.default_account().unwrap().scope().unwrap().as_ref(),
            "99"
        );
    }

    #[test]
    fn test_sessions_share_one_client() {
        let kloudless = Kloudless::new(&config(Some("1"))).unwrap();
        let account = kloudless.default_account().unwrap();
        assert!(Arc::ptr_eq(kloudless.client(), account.client()));
    }
}
