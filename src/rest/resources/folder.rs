//! Storage folders.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde_json::json;

use crate::clients::HttpMethod;
use crate::rest::resource::into_object;
use crate::rest::resources::file::copy_body;
use crate::rest::{
    Collection, ListParams, Pager, Resource, ResourceError, ResourceKind, ResourceOperation,
    ResourcePath, ResourceProxy,
};

/// Id of the root folder of every account.
pub const ROOT_FOLDER_ID: &str = "root";

pub(crate) const PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Retrieve,
        &["account_id", "id"],
        "accounts/{account_id}/storage/folders/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Create,
        &["account_id"],
        "accounts/{account_id}/storage/folders",
    ),
    ResourcePath::new(
        HttpMethod::Patch,
        ResourceOperation::Update,
        &["account_id", "id"],
        "accounts/{account_id}/storage/folders/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Delete,
        ResourceOperation::Delete,
        &["account_id", "id"],
        "accounts/{account_id}/storage/folders/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Contents,
        &["account_id", "id"],
        "accounts/{account_id}/storage/folders/{id}/contents",
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Copy,
        &["account_id", "id"],
        "accounts/{account_id}/storage/folders/{id}/copy",
    ),
];

/// A storage folder.
#[derive(Debug, Clone)]
pub struct Folder(Resource);

impl Folder {
    /// Lists the files and folders directly inside this folder.
    ///
    /// Entries are [`ResourceKind::File`] or [`ResourceKind::Folder`]
    /// proxies according to their `type`.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error of the first page.
    pub async fn contents(&self, params: ListParams) -> Result<Pager<Resource>, ResourceError> {
        let target = self.0.resolve(ResourceOperation::Contents)?;
        Pager::start(
            Arc::clone(self.0.client()),
            ResourceKind::File,
            self.0.account_id().cloned(),
            target.path,
            params,
        )
        .await
    }

    /// Copies the folder into `parent_id`, optionally renaming it.
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
        let fields = into_object(response.body, ResourceKind::Folder)?;
        Ok(Self(self.0.sibling(ResourceKind::Folder, fields)))
    }

    /// Returns `true` for the account's root folder.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.id().as_deref() == Some(ROOT_FOLDER_ID)
    }
}

impl Collection<Folder> {
    /// Fetches the account's root folder.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors from the request.
    pub async fn root(&self) -> Result<Folder, ResourceError> {
        self.retrieve(ROOT_FOLDER_ID).await
    }

    /// Creates a folder named `name` inside `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns API or transport errors from the request.
    pub async fn create_folder(&self, parent_id: &str, name: &str) -> Result<Folder, ResourceError> {
        self.create(&json!({ "parent_id": parent_id, "name": name }))
            .await
    }
}

impl From<Resource> for Folder {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl ResourceProxy for Folder {
    fn resource(&self) -> &Resource {
        &self.0
    }

    fn into_resource(self) -> Resource {
        self.0
    }
}

impl Deref for Folder {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Folder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
