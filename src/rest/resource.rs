//! The resource proxy.
//!
//! A [`Resource`] is the local stand-in for one remote entity: a file, a
//! folder, a link, a CRM campaign and so on. It holds the last known server
//! field map together with the set of fields written locally since then,
//! and knows its [`ResourceKind`], which decides the paths it talks to.
//!
//! Field access is explicit. [`Resource::get`] returns an `Option`;
//! [`Resource::field`] follows the configured [`FieldAccess`]; typed getters
//! such as [`Resource::get_str`] convert on the way out.
//!
//! ```rust,ignore
//! let mut file = account.files().retrieve("F1").await?;
//! assert_eq!(file.get_str("type"), Some("file"));
//!
//! file.set("name", "renamed test.txt");
//! assert!(file.is_dirty());
//!
//! file.save().await?; // PATCH {"name": "renamed test.txt"}
//! assert!(!file.is_dirty());
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::clients::{HttpMethod, HttpResponse, Query, RestClient, RestError};
use crate::config::{AccountId, FieldAccess};
use crate::rest::kind::{resolve_path, ResolvedPath};
use crate::rest::{ResourceError, ResourceKind, ResourceOperation, TrackedFields};

static NULL: Value = Value::Null;

/// A typed view over a [`Resource`].
///
/// Collections and pagers are generic over this trait so that, for example,
/// the files collection yields [`File`](crate::rest::resources::File)s with
/// file-specific methods while sharing the proxy machinery.
pub trait ResourceProxy: From<Resource> + Clone + Send + Sync {
    /// Returns the underlying proxy.
    fn resource(&self) -> &Resource;

    /// Consumes the view and returns the underlying proxy.
    fn into_resource(self) -> Resource;
}

impl ResourceProxy for Resource {
    fn resource(&self) -> &Resource {
        self
    }

    fn into_resource(self) -> Resource {
        self
    }
}

/// One remote entity.
#[derive(Clone)]
pub struct Resource {
    client: Arc<RestClient>,
    kind: ResourceKind,
    account_id: Option<AccountId>,
    fields: TrackedFields,
    stale: bool,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind)
            .field("account_id", &self.account_id)
            .field("fields", &self.fields)
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}

impl Resource {
    /// Creates an empty proxy for an entity that does not exist yet.
    ///
    /// Set fields on it and call [`save`](Self::save) to create it.
    #[must_use]
    pub fn new(client: Arc<RestClient>, kind: ResourceKind, account_id: Option<AccountId>) -> Self {
        Self::with_fields(client, kind, account_id, Map::new())
    }

    /// Creates a proxy for an entity that does not exist yet, with every
    /// given field marked dirty.
    #[must_use]
    pub fn with_fields(
        client: Arc<RestClient>,
        kind: ResourceKind,
        account_id: Option<AccountId>,
        fields: Map<String, Value>,
    ) -> Self {
        Self {
            client,
            kind,
            account_id,
            fields: TrackedFields::with_fields(fields),
            stale: false,
        }
    }

    /// Creates a clean proxy from a server representation.
    ///
    /// Storage listings mix files and folders; the `type` field picks the
    /// kind for those.
    #[must_use]
    pub fn from_server(
        client: Arc<RestClient>,
        kind: ResourceKind,
        account_id: Option<AccountId>,
        fields: Map<String, Value>,
    ) -> Self {
        Self {
            client,
            kind: kind.for_item(&fields),
            account_id,
            fields: TrackedFields::from_server(fields),
            stale: false,
        }
    }

    /// Fetches one entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the server answers 404, and
    /// the usual API and transport errors otherwise.
    pub async fn retrieve(
        client: Arc<RestClient>,
        kind: ResourceKind,
        account_id: Option<AccountId>,
        id: &str,
    ) -> Result<Self, ResourceError> {
        let target = resolve_path(kind, ResourceOperation::Retrieve, account_id.as_ref(), Some(id))?;
        let response = client
            .get(&target.path, None)
            .await
            .map_err(|e| ResourceError::from_rest(e, kind.name(), Some(id)))?;
        let fields = into_object(response.body, kind)?;
        Ok(Self::from_server(client, kind, account_id, fields))
    }

    /// Returns the kind of this entity.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the account this entity belongs to, if scoped to one.
    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    /// Returns the server id, if the entity has one.
    ///
    /// Numeric ids (accounts use them) are returned in their decimal form.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Returns the `type` discriminator (`file`, `folder`, `Campaign`, ...).
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.get_str("type")
    }

    /// Returns the shared REST client.
    #[must_use]
    pub const fn client(&self) -> &Arc<RestClient> {
        &self.client
    }

    /// Returns a field value, or `None` if absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a field value according to the configured [`FieldAccess`].
    ///
    /// # Errors
    ///
    /// In [`FieldAccess::Strict`] mode, returns
    /// [`ResourceError::UnknownField`] for an absent field. In lenient mode
    /// an absent field reads as JSON `null`.
    pub fn field(&self, name: &str) -> Result<&Value, ResourceError> {
        match (self.fields.get(name), self.client.field_access()) {
            (Some(value), _) => Ok(value),
            (None, FieldAccess::Lenient) => Ok(&NULL),
            (None, FieldAccess::Strict) => Err(ResourceError::UnknownField {
                resource: self.kind.name(),
                field: name.to_string(),
            }),
        }
    }

    /// Returns a string field.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns a boolean field.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Returns a signed integer field.
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Returns an unsigned integer field.
    #[must_use]
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    /// Returns an RFC 3339 timestamp field such as `created` or `modified`.
    #[must_use]
    pub fn get_datetime(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get_str(name)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Deserializes a field into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Decode`] if the field does not deserialize
    /// into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ResourceError> {
        self.get(name)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| ResourceError::Decode {
                    resource: self.kind.name(),
                    message: format!("field '{name}': {e}"),
                })
            })
            .transpose()
    }

    /// Returns `true` if the field is present, dirty or not.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Stores a value and marks the field dirty. No request is sent.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.set(name, value.into());
    }

    /// Drops the dirty mark on a field, restoring its server value.
    ///
    /// Returns `true` if the field was dirty.
    pub fn unset(&mut self, name: &str) -> bool {
        self.fields.unset(name)
    }

    /// Returns `true` if any field was written since the last sync.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.fields.is_dirty()
    }

    /// Returns the names of dirty fields.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.dirty_fields()
    }

    /// Returns `true` if the entity does not exist server-side yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.fields.is_new() || self.id().is_none()
    }

    /// Returns `true` once the entity was deleted through this proxy.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns the current field map.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        self.fields.as_map()
    }

    /// Returns the current fields as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.as_map().clone())
    }

    /// Persists local changes.
    ///
    /// A new entity is created with every set field (POST). An existing
    /// entity sends only its dirty fields (PATCH); with nothing dirty no
    /// request is made. On success the field map is replaced by the server
    /// response and the dirty set is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PathResolutionFailed`] if the kind cannot be
    /// created or updated, and API or transport errors from the request.
    pub async fn save(&mut self) -> Result<(), ResourceError> {
        self.save_with(Map::new()).await
    }

    /// Persists local changes, sending `extra` alongside the changed fields.
    ///
    /// `extra` is request-only: it is not stored as dirty state. Links, for
    /// example, take their `file_id` this way.
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save).
    pub async fn save_with(&mut self, extra: Map<String, Value>) -> Result<(), ResourceError> {
        self.ensure_live()?;
        let id = self.id();
        let creating = self.is_new();

        if !creating && !self.is_dirty() && extra.is_empty() {
            debug!(resource = self.kind.name(), id = ?id, "Nothing to save");
            return Ok(());
        }

        let operation = if creating {
            ResourceOperation::Create
        } else {
            ResourceOperation::Update
        };
        let target = self.resolve(operation)?;

        let mut body = if creating {
            self.fields.as_map().clone()
        } else {
            match self.fields.changed_fields() {
                Value::Object(changed) => changed,
                _ => Map::new(),
            }
        };
        body.extend(extra);

        let response = self
            .send_json(&target, Value::Object(body), None)
            .await
            .map_err(|e| self.map_error(e))?;

        let fields = into_object(response.body, self.kind)?;
        self.kind = self.kind.for_item(&fields);
        self.fields.mark_clean(fields);
        Ok(())
    }

    /// Deletes the entity.
    ///
    /// Files and folders send `permanent=true|false`; other kinds ignore the
    /// flag. After success the proxy is stale: saving, refreshing, deleting
    /// or any other server-side call through it fails with
    /// [`ResourceError::NotFound`] without sending a request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for an unsaved entity and
    /// [`ResourceError::NotFound`] if it is already gone.
    pub async fn delete(&mut self, permanent: bool) -> Result<(), ResourceError> {
        let target = self.resolve(ResourceOperation::Delete)?;
        let query = self
            .kind
            .supports_permanent_delete()
            .then(|| vec![("permanent".to_string(), permanent.to_string())]);

        self.client
            .delete(&target.path, query)
            .await
            .map_err(|e| self.map_error(e))?;

        debug!(resource = self.kind.name(), id = ?self.id(), permanent, "Deleted resource");
        self.stale = true;
        Ok(())
    }

    /// Re-fetches the entity, discarding local changes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for an unsaved entity, and API or
    /// transport errors from the request.
    pub async fn refresh(&mut self) -> Result<(), ResourceError> {
        let target = self.resolve(ResourceOperation::Retrieve)?;
        let response = self
            .client
            .get(&target.path, None)
            .await
            .map_err(|e| self.map_error(e))?;
        let fields = into_object(response.body, self.kind)?;
        self.fields.mark_clean(fields);
        Ok(())
    }

    /// Resolves the path for an operation using this entity's ids.
    ///
    /// Fails with [`ResourceError::NotFound`] once the entity was deleted.
    pub(crate) fn resolve(&self, operation: ResourceOperation) -> Result<ResolvedPath, ResourceError> {
        self.ensure_live()?;
        let id = self.id();
        resolve_path(self.kind, operation, self.account_id.as_ref(), id.as_deref())
    }

    fn ensure_live(&self) -> Result<(), ResourceError> {
        if !self.stale {
            return Ok(());
        }
        let id = self.id();
        let message = format!("{} was deleted", self.kind.name());
        Err(ResourceError::from_http_response(
            404,
            &json!({"status_code": 404, "error_code": "not_found", "message": message}),
            self.kind.name(),
            id.as_deref(),
            None,
        ))
    }

    /// Maps a REST error for this entity.
    pub(crate) fn map_error(&self, error: RestError) -> ResourceError {
        ResourceError::from_rest(error, self.kind.name(), self.id().as_deref())
    }

    /// Sends a JSON body with the method the path declares.
    pub(crate) async fn send_json(
        &self,
        target: &ResolvedPath,
        body: Value,
        query: Option<Query>,
    ) -> Result<HttpResponse, RestError> {
        match target.http_method {
            HttpMethod::Get => self.client.get(&target.path, query).await,
            HttpMethod::Post => self.client.post(&target.path, body, query).await,
            HttpMethod::Put => self.client.put(&target.path, body, query).await,
            HttpMethod::Patch => self.client.patch(&target.path, body, query).await,
            HttpMethod::Delete => self.client.delete(&target.path, query).await,
        }
    }

    /// Replaces the field map with a server representation.
    pub(crate) fn apply_server(&mut self, fields: Map<String, Value>) {
        self.fields.mark_clean(fields);
    }

    /// Builds a clean proxy of `kind` in the same account.
    pub(crate) fn sibling(&self, kind: ResourceKind, fields: Map<String, Value>) -> Self {
        Self::from_server(Arc::clone(&self.client), kind, self.account_id.clone(), fields)
    }
}

/// Unwraps a JSON object response body.
pub(crate) fn into_object(body: Value, kind: ResourceKind) -> Result<Map<String, Value>, ResourceError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ResourceError::Decode {
            resource: kind.name(),
            message: format!("expected a JSON object, got {other}"),
        }),
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};
