//! Path building infrastructure for REST resources.
//!
//! Every resource kind declares a static table of [`ResourcePath`]s, one per
//! supported operation. A path names the ids it needs (`account_id`, `id`,
//! ...) and a template with `{placeholder}`s. [`get_path`] picks the most
//! specific path whose ids are all available; a kind that does not support
//! an operation simply has no entry for it.
//!
//! # Example
//!
//! ```rust
//! use kloudless::rest::{build_path, get_path, ResourceOperation, ResourcePath};
//! use kloudless::HttpMethod;
//! use std::collections::HashMap;
//!
//! const PATHS: &[ResourcePath] = &[
//!     ResourcePath::new(
//!         HttpMethod::Get,
//!         ResourceOperation::Retrieve,
//!         &["account_id", "id"],
//!         "accounts/{account_id}/storage/files/{id}",
//!     ),
//! ];
//!
//! let path = get_path(PATHS, ResourceOperation::Retrieve, &["account_id", "id"]).unwrap();
//!
//! let mut ids = HashMap::new();
//! ids.insert("account_id", "42");
//! ids.insert("id", "F/a b");
//! assert_eq!(
//!     build_path(path.template, &ids),
//!     "accounts/42/storage/files/F%2Fa%20b"
//! );
//! ```

use crate::clients::HttpMethod;
use std::collections::HashMap;
use std::fmt::Display;

/// Operations that can be performed against a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// Fetch a single resource by id.
    Retrieve,
    /// List a collection.
    List,
    /// Create a resource.
    Create,
    /// Partially update a resource.
    Update,
    /// Delete a resource.
    Delete,
    /// Download file contents, or list folder contents.
    Contents,
    /// Replace file contents.
    UpdateContents,
    /// Copy a file or folder.
    Copy,
    /// List custom properties of a file.
    ListProperties,
    /// Add, change or remove custom properties of a file.
    UpdateProperties,
    /// Remove every custom property of a file.
    DeleteProperties,
    /// List the groups a user belongs to.
    Memberships,
    /// List the users in a group.
    Members,
    /// Request a direct upload URL.
    UploadUrl,
    /// List recently modified files.
    Recent,
    /// Search files and folders.
    Search,
    /// Fetch the latest event cursor.
    LatestCursor,
}

impl ResourceOperation {
    /// Returns the default HTTP method for this operation.
    #[must_use]
    pub const fn default_http_method(&self) -> HttpMethod {
        match self {
            Self::Retrieve
            | Self::List
            | Self::Contents
            | Self::ListProperties
            | Self::Memberships
            | Self::Members
            | Self::Recent
            | Self::Search
            | Self::LatestCursor => HttpMethod::Get,
            Self::Create | Self::Copy | Self::UploadUrl => HttpMethod::Post,
            Self::UpdateContents => HttpMethod::Put,
            Self::Update | Self::UpdateProperties => HttpMethod::Patch,
            Self::Delete | Self::DeleteProperties => HttpMethod::Delete,
        }
    }

    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Contents => "contents",
            Self::UpdateContents => "update_contents",
            Self::Copy => "copy",
            Self::ListProperties => "list_properties",
            Self::UpdateProperties => "update_properties",
            Self::DeleteProperties => "delete_properties",
            Self::Memberships => "memberships",
            Self::Members => "members",
            Self::UploadUrl => "upload_url",
            Self::Recent => "recent",
            Self::Search => "search",
            Self::LatestCursor => "latest_cursor",
        }
    }
}

/// A path configuration for a resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath {
    /// The HTTP method for this path.
    pub http_method: HttpMethod,
    /// The operation this path is used for.
    pub operation: ResourceOperation,
    /// Required id parameters (e.g., `["account_id", "id"]`).
    pub ids: &'static [&'static str],
    /// The URL template with `{id}` placeholders.
    pub template: &'static str,
}

impl ResourcePath {
    /// Creates a new `ResourcePath`.
    #[must_use]
    pub const fn new(
        http_method: HttpMethod,
        operation: ResourceOperation,
        ids: &'static [&'static str],
        template: &'static str,
    ) -> Self {
        Self {
            http_method,
            operation,
            ids,
            template,
        }
    }

    /// Returns the number of required ids for this path.
    #[must_use]
    pub const fn id_count(&self) -> usize {
        self.ids.len()
    }

    /// Checks if all required ids are available.
    #[must_use]
    pub fn matches_ids(&self, available_ids: &[&str]) -> bool {
        self.ids.iter().all(|id| available_ids.contains(id))
    }
}

/// Selects the most specific path for an operation whose ids are available.
#[must_use]
pub fn get_path<'a>(
    paths: &'a [ResourcePath],
    operation: ResourceOperation,
    available_ids: &[&str],
) -> Option<&'a ResourcePath> {
    paths
        .iter()
        .filter(|p| p.operation == operation)
        .filter(|p| p.matches_ids(available_ids))
        .max_by_key(|p| p.id_count())
}

/// Builds a URL path from a template by interpolating ids.
///
/// Values are percent-encoded, since storage ids routinely contain `/`,
/// `=` and spaces. Placeholders missing from `ids` are left as they are.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn build_path<V: Display>(template: &str, ids: &HashMap<&str, V>) -> String {
    let mut result = template.to_string();

    for (key, value) in ids {
        let placeholder = format!("{{{key}}}");
        let encoded = urlencoding::encode(&value.to_string()).into_owned();
        result = result.replace(&placeholder, &encoded);
    }

    result
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceOperation>();
    assert_send_sync::<ResourcePath>();
};
