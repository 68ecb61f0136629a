//! Connected accounts.
//!
//! An [`Account`] is both a resource (its metadata: `service`, `admin`,
//! `active`, ...) and the scope of every storage, team, event and CRM
//! collection. Collection handles are built on demand and share the
//! account's client.
//!
//! ```rust,ignore
//! let account = kloudless.account(AccountId::new("832496")?);
//!
//! let root = account.folders().root().await?;
//! let mut contents = root.contents(ListParams::new()).await?;
//!
//! let campaigns = account.crm_campaigns().all(ListParams::new().page_size(1)).await?;
//! for campaign in campaigns.page() {
//!     println!("{:?} raw={}", campaign.id(), campaign.has_field("raw"));
//! }
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::clients::HttpMethod;
use crate::config::AccountId;
use crate::rest::resources::{File, Folder, Group, User};
use crate::rest::{
    Collection, CrmObject, Resource, ResourceKind, ResourceOperation, ResourcePath, ResourceProxy,
};

pub(crate) const PATHS: &[ResourcePath] = &[
    ResourcePath::new(HttpMethod::Get, ResourceOperation::List, &[], "accounts"),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Retrieve,
        &["id"],
        "accounts/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Patch,
        ResourceOperation::Update,
        &["id"],
        "accounts/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Delete,
        ResourceOperation::Delete,
        &["id"],
        "accounts/{id}",
    ),
];

/// A connected account.
#[derive(Debug, Clone)]
pub struct Account(Resource);

impl Account {
    /// Returns the id used to scope this account's collections.
    #[must_use]
    pub fn scope(&self) -> Option<AccountId> {
        self.0.id().and_then(|id| AccountId::new(id).ok())
    }

    /// Returns the service the account is connected to (`box`, `gdrive`, ...).
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.0.get_str("service")
    }

    /// Returns whether the account was connected as an admin account.
    #[must_use]
    pub fn is_admin(&self) -> Option<bool> {
        self.0.get_bool("admin")
    }

    /// Storage files.
    #[must_use]
    pub fn files(&self) -> Collection<File> {
        self.collection(ResourceKind::File)
    }

    /// Storage folders.
    #[must_use]
    pub fn folders(&self) -> Collection<Folder> {
        self.collection(ResourceKind::Folder)
    }

    /// Shared links.
    #[must_use]
    pub fn links(&self) -> Collection<Resource> {
        self.collection(ResourceKind::Link)
    }

    /// Recently modified files, newest first as the server orders them.
    ///
    /// Accepts `page_size`, `page` and `after`.
    #[must_use]
    pub fn recent(&self) -> Collection<Resource> {
        self.listing(ResourceKind::File, ResourceOperation::Recent)
    }

    /// Files and folders matching a query. Requires `q`.
    #[must_use]
    pub fn search(&self) -> Collection<Resource> {
        self.listing(ResourceKind::File, ResourceOperation::Search)
    }

    /// Activity events.
    #[must_use]
    pub fn events(&self) -> Collection<Resource> {
        self.collection(ResourceKind::Event)
    }

    /// Team users.
    #[must_use]
    pub fn users(&self) -> Collection<User> {
        self.collection(ResourceKind::User)
    }

    /// Team groups.
    #[must_use]
    pub fn groups(&self) -> Collection<Group> {
        self.collection(ResourceKind::Group)
    }

    /// The CRM objects of one family.
    #[must_use]
    pub fn crm(&self, object: CrmObject) -> Collection<Resource> {
        self.collection(ResourceKind::Crm(object))
    }

    /// CRM accounts.
    #[must_use]
    pub fn crm_accounts(&self) -> Collection<Resource> {
        self.crm(CrmObject::Account)
    }

    /// CRM contacts.
    #[must_use]
    pub fn crm_contacts(&self) -> Collection<Resource> {
        self.crm(CrmObject::Contact)
    }

    /// CRM leads.
    #[must_use]
    pub fn crm_leads(&self) -> Collection<Resource> {
        self.crm(CrmObject::Lead)
    }

    /// CRM opportunities.
    #[must_use]
    pub fn crm_opportunities(&self) -> Collection<Resource> {
        self.crm(CrmObject::Opportunity)
    }

    /// CRM campaigns.
    #[must_use]
    pub fn crm_campaigns(&self) -> Collection<Resource> {
        self.crm(CrmObject::Campaign)
    }

    /// CRM tasks.
    #[must_use]
    pub fn crm_tasks(&self) -> Collection<Resource> {
        self.crm(CrmObject::Task)
    }

    /// CRM events.
    #[must_use]
    pub fn crm_events(&self) -> Collection<Resource> {
        self.crm(CrmObject::Event)
    }

    fn collection<T: ResourceProxy>(&self, kind: ResourceKind) -> Collection<T> {
        self.listing(kind, ResourceOperation::List)
    }

    fn listing<T: ResourceProxy>(
        &self,
        kind: ResourceKind,
        operation: ResourceOperation,
    ) -> Collection<T> {
        Collection::with_operation(Arc::clone(self.0.client()), kind, self.scope(), operation)
    }
}

impl From<Resource> for Account {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl ResourceProxy for Account {
    fn resource(&self) -> &Resource {
        &self.0
    }

    fn into_resource(self) -> Resource {
        self.0
    }
}

impl Deref for Account {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Account {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, KloudlessConfig};
    use crate::rest::resolve_path;
    use crate::clients::RestClient;
    use serde_json::json;

    fn account() -> Account {
        let config = KloudlessConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build()
            .unwrap();
        let client = Arc::new(RestClient::new(&config).unwrap());
        let fields = json!({"id": 42, "service": "box", "admin": false});
        Account::from(Resource::from_server(
            client,
            ResourceKind::Account,
            None,
            fields.as_object().cloned().unwrap(),
        ))
    }

    #[test]
    fn test_account_fields() {
        let account = account();
        assert_eq!(account.scope().unwrap().as_ref(), "42");
        assert_eq!(account.service(), Some("box"));
        assert_eq!(account.is_admin(), Some(false));
    }

    #[test]
    fn test_collections_are_scoped_to_the_account() {
        let account = account();

        let files = account.files();
        assert_eq!(files.kind(), ResourceKind::File);
        assert_eq!(files.account_id().map(ToString::to_string), Some("42".to_string()));

        let campaigns = account.crm_campaigns();
        assert_eq!(campaigns.kind(), ResourceKind::Crm(CrmObject::Campaign));
    }

    #[test]
    fn test_recent_and_search_paths() {
        let scope = account().scope();
        let recent =
            resolve_path(ResourceKind::File, ResourceOperation::Recent, scope.as_ref(), None).unwrap();
        assert_eq!(recent.path, "accounts/42/storage/recent");

        let search =
            resolve_path(ResourceKind::File, ResourceOperation::Search, scope.as_ref(), None).unwrap();
        assert_eq!(search.path, "accounts/42/storage/search");
    }
}
