//! Collection handles.
//!
//! A [`Collection`] names one listing endpoint inside an account: its
//! [`ResourceKind`], the account it is scoped to and which list operation it
//! uses. It is cheap to create; nothing is fetched until
//! [`all`](Collection::all), [`retrieve`](Collection::retrieve) or
//! [`create`](Collection::create) is called.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::RestClient;
use crate::config::AccountId;
use crate::rest::kind::resolve_path;
use crate::rest::resource::into_object;
use crate::rest::{
    ListParams, Pager, Resource, ResourceError, ResourceKind, ResourceOperation, ResourceProxy,
};

/// A listing endpoint yielding `T` proxies.
pub struct Collection<T = Resource> {
    client: Arc<RestClient>,
    kind: ResourceKind,
    account_id: Option<AccountId>,
    list_operation: ResourceOperation,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            kind: self.kind,
            account_id: self.account_id.clone(),
            list_operation: self.list_operation,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("kind", &self.kind)
            .field("account_id", &self.account_id)
            .field("list_operation", &self.list_operation)
            .finish_non_exhaustive()
    }
}

impl<T: ResourceProxy> Collection<T> {
    /// Creates a collection listed with [`ResourceOperation::List`].
    #[must_use]
    pub fn new(client: Arc<RestClient>, kind: ResourceKind, account_id: Option<AccountId>) -> Self {
        Self::with_operation(client, kind, account_id, ResourceOperation::List)
    }

    /// Creates a collection listed with another operation, such as
    /// [`ResourceOperation::Recent`] or [`ResourceOperation::Search`].
    #[must_use]
    pub fn with_operation(
        client: Arc<RestClient>,
        kind: ResourceKind,
        account_id: Option<AccountId>,
        list_operation: ResourceOperation,
    ) -> Self {
        Self {
            client,
            kind,
            account_id,
            list_operation,
            _marker: PhantomData,
        }
    }

    /// Returns the kind of the items.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the account this collection is scoped to.
    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    /// Fetches the first page and returns a pager over the listing.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error of the first request.
    pub async fn all(&self, params: ListParams) -> Result<Pager<T>, ResourceError> {
        let target = resolve_path(self.kind, self.list_operation, self.account_id.as_ref(), None)?;
        Pager::start(
            Arc::clone(&self.client),
            self.kind,
            self.account_id.clone(),
            target.path,
            params,
        )
        .await
    }

    /// Fetches one entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if there is no such entity.
    pub async fn retrieve(&self, id: &str) -> Result<T, ResourceError> {
        Resource::retrieve(Arc::clone(&self.client), self.kind, self.account_id.clone(), id)
            .await
            .map(T::from)
    }

    /// Creates an entity from `data` and returns its proxy.
    ///
    /// `data` must serialize to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PathResolutionFailed`] if the kind cannot be
    /// created, and API or transport errors from the request.
    pub async fn create<B: Serialize + ?Sized>(&self, data: &B) -> Result<T, ResourceError> {
        let fields = match serde_json::to_value(data) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                return Err(ResourceError::Decode {
                    resource: self.kind.name(),
                    message: format!("create data must be a JSON object, got {other}"),
                });
            }
            Err(e) => {
                return Err(ResourceError::Decode {
                    resource: self.kind.name(),
                    message: e.to_string(),
                });
            }
        };

        let mut resource = self.build(fields);
        resource.save().await?;
        Ok(T::from(resource))
    }

    /// Returns an unsaved proxy with `fields` set, for a later
    /// [`save`](Resource::save).
    #[must_use]
    pub fn build(&self, fields: Map<String, Value>) -> Resource {
        Resource::with_fields(
            Arc::clone(&self.client),
            self.kind,
            self.account_id.clone(),
            fields,
        )
    }

    /// Fetches the latest event cursor.
    ///
    /// Only the events collection supports this.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PathResolutionFailed`] for other kinds.
    pub async fn latest_cursor(&self) -> Result<Value, ResourceError> {
        let target = resolve_path(
            self.kind,
            ResourceOperation::LatestCursor,
            self.account_id.as_ref(),
            None,
        )?;
        let response = self
            .client
            .get(&target.path, None)
            .await
            .map_err(|e| ResourceError::from_rest(e, self.kind.name(), None))?;
        let mut body = into_object(response.body, self.kind)?;
        Ok(body.remove("cursor").unwrap_or(Value::Null))
    }

    pub(crate) const fn client(&self) -> &Arc<RestClient> {
        &self.client
    }
}
