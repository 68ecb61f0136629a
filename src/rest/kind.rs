//! Resource kinds and path resolution.
//!
//! A [`ResourceKind`] names the endpoint family a resource belongs to and
//! owns the static path table for it. [`resolve_path`] turns a kind, an
//! operation and the ids at hand into a concrete request path.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::config::AccountId;
use crate::error::ConfigError;
use crate::rest::path::{build_path, get_path, ResourceOperation, ResourcePath};
use crate::rest::resources::{account, crm, event, file, folder, link, team};
use crate::rest::ResourceError;

/// The CRM object families exposed under `crm/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrmObject {
    /// `crm/accounts`
    Account,
    /// `crm/contacts`
    Contact,
    /// `crm/leads`
    Lead,
    /// `crm/opportunities`
    Opportunity,
    /// `crm/campaigns`
    Campaign,
    /// `crm/tasks`
    Task,
    /// `crm/events`
    Event,
}

impl CrmObject {
    /// Every CRM object family.
    pub const ALL: [Self; 7] = [
        Self::Account,
        Self::Contact,
        Self::Lead,
        Self::Opportunity,
        Self::Campaign,
        Self::Task,
        Self::Event,
    ];

    /// Returns the URL segment for this family (e.g., `campaigns`).
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Contact => "contacts",
            Self::Lead => "leads",
            Self::Opportunity => "opportunities",
            Self::Campaign => "campaigns",
            Self::Task => "tasks",
            Self::Event => "events",
        }
    }

    /// Returns the `type` value the API reports for objects of this family.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Contact => "Contact",
            Self::Lead => "Lead",
            Self::Opportunity => "Opportunity",
            Self::Campaign => "Campaign",
            Self::Task => "Task",
            Self::Event => "Event",
        }
    }
}

/// The endpoint family of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A connected account.
    Account,
    /// A storage file.
    File,
    /// A storage folder.
    Folder,
    /// A shared link.
    Link,
    /// A team user.
    User,
    /// A team group.
    Group,
    /// An activity event.
    Event,
    /// A CRM object.
    Crm(CrmObject),
}

impl ResourceKind {
    /// Returns the kind name used in errors and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::File => "File",
            Self::Folder => "Folder",
            Self::Link => "Link",
            Self::User => "User",
            Self::Group => "Group",
            Self::Event => "Event",
            Self::Crm(object) => object.type_name(),
        }
    }

    /// Returns the path table for this kind.
    #[must_use]
    pub const fn paths(self) -> &'static [ResourcePath] {
        match self {
            Self::Account => account::PATHS,
            Self::File => file::PATHS,
            Self::Folder => folder::PATHS,
            Self::Link => link::PATHS,
            Self::User => team::USER_PATHS,
            Self::Group => team::GROUP_PATHS,
            Self::Event => event::PATHS,
            Self::Crm(_) => crm::PATHS,
        }
    }

    /// Returns `true` for kinds whose delete takes a `permanent` flag.
    #[must_use]
    pub const fn supports_permanent_delete(self) -> bool {
        matches!(self, Self::File | Self::Folder)
    }

    /// Returns the kind of one entry of a storage listing.
    ///
    /// Recent, search and folder listings mix files and folders; the `type`
    /// field decides. Other kinds are returned unchanged.
    #[must_use]
    pub fn for_item(self, fields: &Map<String, Value>) -> Self {
        match self {
            Self::File | Self::Folder => match fields.get("type").and_then(Value::as_str) {
                Some("folder") => Self::Folder,
                Some("file") => Self::File,
                _ => self,
            },
            other => other,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The HTTP method declared for the path.
    pub http_method: HttpMethod,
    /// The interpolated path, relative to the versioned base.
    pub path: String,
}

/// Resolves the request path for `operation` on `kind`.
///
/// # Errors
///
/// - [`ResourceError::PathResolutionFailed`] if the kind has no path for the
///   operation.
/// - [`ResourceError::MissingId`] if the operation needs an id and none was
///   given.
/// - [`ResourceError::Config`] if the operation needs an account id and none
///   was given.
pub fn resolve_path(
    kind: ResourceKind,
    operation: ResourceOperation,
    account_id: Option<&AccountId>,
    id: Option<&str>,
) -> Result<ResolvedPath, ResourceError> {
    let mut ids: HashMap<&str, &str> = HashMap::new();
    if let Some(account_id) = account_id {
        ids.insert("account_id", account_id.as_ref());
    }
    if let Some(id) = id {
        ids.insert("id", id);
    }
    if let ResourceKind::Crm(object) = kind {
        ids.insert("crm_object", object.path_segment());
    }

    let available: Vec<&str> = ids.keys().copied().collect();
    let paths = kind.paths();

    if let Some(path) = get_path(paths, operation, &available) {
        return Ok(ResolvedPath {
            http_method: path.http_method,
            path: build_path(path.template, &ids),
        });
    }

    let candidates: Vec<&ResourcePath> =
        paths.iter().filter(|p| p.operation == operation).collect();

    if candidates.is_empty() {
        return Err(ResourceError::PathResolutionFailed {
            resource: kind.name(),
            operation: operation.as_str(),
        });
    }
    if account_id.is_none() && candidates.iter().all(|p| p.ids.contains(&"account_id")) {
        return Err(ConfigError::MissingRequiredField {
            field: "account_id",
        }
        .into());
    }
    if id.is_none() && candidates.iter().all(|p| p.ids.contains(&"id")) {
        return Err(ResourceError::MissingId {
            resource: kind.name(),
            operation: operation.as_str(),
        });
    }

    Err(ResourceError::PathResolutionFailed {
        resource: kind.name(),
        operation: operation.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account() -> AccountId {
        AccountId::new("42").unwrap()
    }

    #[test]
    fn test_resolve_file_paths() {
        let account = account();
        let retrieve =
            resolve_path(ResourceKind::File, ResourceOperation::Retrieve, Some(&account), Some("F1"))
                .unwrap();
        assert_eq!(retrieve.path, "accounts/42/storage/files/F1");
        assert_eq!(retrieve.http_method, HttpMethod::Get);

        let contents =
            resolve_path(ResourceKind::File, ResourceOperation::Contents, Some(&account), Some("F1"))
                .unwrap();
        assert_eq!(contents.path, "accounts/42/storage/files/F1/contents");

        let update = resolve_path(
            ResourceKind::File,
            ResourceOperation::UpdateContents,
            Some(&account),
            Some("F1"),
        )
        .unwrap();
        assert_eq!(update.http_method, HttpMethod::Put);
        assert_eq!(update.path, "accounts/42/storage/files/F1");
    }

    #[test]
    fn test_resolve_crm_paths_use_object_segment() {
        let account = account();
        let kind = ResourceKind::Crm(CrmObject::Campaign);
        let list = resolve_path(kind, ResourceOperation::List, Some(&account), None).unwrap();
        assert_eq!(list.path, "accounts/42/crm/campaigns");

        let opportunity = ResourceKind::Crm(CrmObject::Opportunity);
        let retrieve =
            resolve_path(opportunity, ResourceOperation::Retrieve, Some(&account), Some("O1"))
                .unwrap();
        assert_eq!(retrieve.path, "accounts/42/crm/opportunities/O1");
    }

    #[test]
    fn test_resolve_account_paths() {
        let list = resolve_path(ResourceKind::Account, ResourceOperation::List, None, None).unwrap();
        assert_eq!(list.path, "accounts");

        let retrieve =
            resolve_path(ResourceKind::Account, ResourceOperation::Retrieve, None, Some("7")).unwrap();
        assert_eq!(retrieve.path, "accounts/7");
    }

    #[test]
    fn test_unsupported_operation_fails_locally() {
        let error = resolve_path(
            ResourceKind::Link,
            ResourceOperation::Contents,
            Some(&account()),
            Some("L1"),
        )
        .unwrap_err();
        assert!(matches!(
            error,
            ResourceError::PathResolutionFailed {
                resource: "Link",
                operation: "contents"
            }
        ));
    }

    #[test]
    fn test_missing_id_is_reported() {
        let error =
            resolve_path(ResourceKind::File, ResourceOperation::Delete, Some(&account()), None)
                .unwrap_err();
        assert!(matches!(error, ResourceError::MissingId { resource: "File", .. }));
    }

    #[test]
    fn test_missing_account_is_a_config_error() {
        let error =
            resolve_path(ResourceKind::Folder, ResourceOperation::Retrieve, None, Some("root"))
                .unwrap_err();
        assert!(matches!(
            error,
            ResourceError::Config(ConfigError::MissingRequiredField {
                field: "account_id"
            })
        ));
    }

    #[test]
    fn test_for_item_switches_between_files_and_folders() {
        let folder = json!({"type": "folder"}).as_object().cloned().unwrap();
        let file = json!({"type": "file"}).as_object().cloned().unwrap();
        let other = json!({}).as_object().cloned().unwrap();

        assert_eq!(ResourceKind::File.for_item(&folder), ResourceKind::Folder);
        assert_eq!(ResourceKind::Folder.for_item(&file), ResourceKind::File);
        assert_eq!(ResourceKind::Folder.for_item(&other), ResourceKind::Folder);
        assert_eq!(ResourceKind::Link.for_item(&folder), ResourceKind::Link);
    }

    #[test]
    fn test_crm_names() {
        assert_eq!(ResourceKind::Crm(CrmObject::Campaign).name(), "Campaign");
        assert_eq!(CrmObject::ALL.len(), 7);
        assert!(ResourceKind::File.supports_permanent_delete());
        assert!(!ResourceKind::Crm(CrmObject::Task).supports_permanent_delete());
    }
}
