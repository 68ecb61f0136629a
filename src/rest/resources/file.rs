//! Storage files.
//!
//! ```rust,ignore
//! let files = account.files();
//! let file = files.upload("test.txt", "root", b"test".to_vec(), false).await?;
//!
//! assert_eq!(file.contents().await?, b"test");
//!
//! let copy = file.copy_to("root", Some("copy of test.txt")).await?;
//! copy.into_resource().delete(true).await?;
//! ```

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::clients::HttpMethod;
use crate::rest::resource::into_object;
use crate::rest::resources::PropertyCollection;
use crate::rest::{
    resolve_path, Collection, Resource, ResourceError, ResourceKind, ResourceOperation,
    ResourcePath, ResourceProxy,
};

/// Header carrying the name and parent of an upload.
pub const METADATA_HEADER: &str = "X-Kloudless-Metadata";

pub(crate) const PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Retrieve,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Create,
        &["account_id"],
        "accounts/{account_id}/storage/files",
    ),
    ResourcePath::new(
        HttpMethod::Patch,
        ResourceOperation::Update,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Put,
        ResourceOperation::UpdateContents,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Delete,
        ResourceOperation::Delete,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Contents,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}/contents",
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Copy,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}/copy",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::ListProperties,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}/properties",
    ),
    ResourcePath::new(
        HttpMethod::Patch,
        ResourceOperation::UpdateProperties,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}/properties",
    ),
    ResourcePath::new(
        HttpMethod::Delete,
        ResourceOperation::DeleteProperties,
        &["account_id", "id"],
        "accounts/{account_id}/storage/files/{id}/properties",
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::UploadUrl,
        &["account_id"],
        "accounts/{account_id}/storage/files/upload_url",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Recent,
        &["account_id"],
        "accounts/{account_id}/storage/recent",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Search,
        &["account_id"],
        "accounts/{account_id}/storage/search",
    ),
];

/// A storage file.
#[derive(Debug, Clone)]
pub struct File(Resource);

impl File {
    /// Downloads the file contents.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if the file is gone, and API or
    /// transport errors otherwise.
    pub async fn contents(&self) -> Result<Vec<u8>, ResourceError> {
        let target = self.0.resolve(ResourceOperation::Contents)?;
        let response = self
            .0
            .client()
            .get(&target.path, None)
            .await
            .map_err(|e| self.0.map_error(e))?;
        Ok(response.bytes)
    }

    /// Replaces the file contents and refreshes the metadata from the
    /// response.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors from the upload.
    pub async fn update_contents(&mut self, data: impl Into<Vec<u8>>) -> Result<(), ResourceError> {
        let target = self.0.resolve(ResourceOperation::UpdateContents)?;
        let response = self
            .0
            .client()
            .send_bytes(target.http_method, &target.path, data.into(), None, None)
            .await
            .map_err(|e| self.0.map_error(e))?;
        let fields = into_object(response.body, ResourceKind::File)?;
        self.0.apply_server(fields);
        Ok(())
    }

    /// Copies the file into `parent_id`, optionally renaming it.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors from the request.
    pub async fn copy_to(&self, parent_id: &str, name: Option<&str>) -> Result<Self, ResourceError> {
        let target = self.0.resolve(ResourceOperation::Copy)?;
        let response = self
            .0
            .send_json(&target, copy_body(parent_id, name), None)
            .await
            .map_err(|e| self.0.map_error(e))?;
        let fields = into_object(response.body, ResourceKind::File)?;
        Ok(Self(self.0.sibling(ResourceKind::File, fields)))
    }

    /// Returns the custom properties of this file.
    #[must_use]
    pub fn properties(&self) -> PropertyCollection {
        PropertyCollection::new(self.0.clone())
    }
}

impl Collection<File> {
    /// Uploads a new file.
    ///
    /// With `overwrite` false the server renames the upload when `name` is
    /// taken; with `overwrite` true it replaces the existing file.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors from the upload.
    pub async fn upload(
        &self,
        name: &str,
        parent_id: &str,
        data: impl Into<Vec<u8>>,
        overwrite: bool,
    ) -> Result<File, ResourceError> {
        let target = resolve_path(ResourceKind::File, ResourceOperation::Create, self.account_id(), None)?;
        let metadata = ascii_json(&json!({"name": name, "parent_id": parent_id}));
        let headers = HashMap::from([(METADATA_HEADER.to_string(), metadata)]);
        let query = vec![("overwrite".to_string(), overwrite.to_string())];

        debug!(name, parent_id, overwrite, "Uploading file");

        let response = self
            .client()
            .send_bytes(target.http_method, &target.path, data.into(), Some(query), Some(headers))
            .await
            .map_err(|e| ResourceError::from_rest(e, ResourceKind::File.name(), None))?;
        let fields = into_object(response.body, ResourceKind::File)?;
        Ok(File(Resource::from_server(
            self.client().clone(),
            ResourceKind::File,
            self.account_id().cloned(),
            fields,
        )))
    }

    /// Requests a URL the caller can upload to directly.
    ///
    /// `data` typically names `parent_id` and `name`. The raw response is
    /// returned; it contains `url`.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors from the request.
    pub async fn upload_url<B: Serialize + ?Sized>(&self, data: &B) -> Result<Value, ResourceError> {
        let target =
            resolve_path(ResourceKind::File, ResourceOperation::UploadUrl, self.account_id(), None)?;
        let body = serde_json::to_value(data).map_err(|e| ResourceError::Decode {
            resource: ResourceKind::File.name(),
            message: e.to_string(),
        })?;
        let response = self
            .client()
            .post(&target.path, body, None)
            .await
            .map_err(|e| ResourceError::from_rest(e, ResourceKind::File.name(), None))?;
        Ok(response.body)
    }
}

pub(crate) fn copy_body(parent_id: &str, name: Option<&str>) -> Value {
    let mut body = json!({ "parent_id": parent_id });
    if let Some(name) = name {
        body["name"] = Value::from(name);
    }
    body
}

/// Serializes `value` with every non-ASCII character escaped, so the result
/// is a valid header value.
fn ascii_json(value: &Value) -> String {
    let raw = value.to_string();
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}

impl From<Resource> for File {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl ResourceProxy for File {
    fn resource(&self) -> &Resource {
        &self.0
    }

    fn into_resource(self) -> Resource {
        self.0
    }
}

impl Deref for File {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for File {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
