//! Team users and groups.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::clients::HttpMethod;
use crate::rest::{
    ListParams, Pager, Resource, ResourceError, ResourceKind, ResourceOperation, ResourcePath,
    ResourceProxy,
};

pub(crate) const USER_PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::List,
        &["account_id"],
        "accounts/{account_id}/team/users",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Retrieve,
        &["account_id", "id"],
        "accounts/{account_id}/team/users/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Memberships,
        &["account_id", "id"],
        "accounts/{account_id}/team/users/{id}/memberships",
    ),
];

pub(crate) const GROUP_PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::List,
        &["account_id"],
        "accounts/{account_id}/team/groups",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Retrieve,
        &["account_id", "id"],
        "accounts/{account_id}/team/groups/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Members,
        &["account_id", "id"],
        "accounts/{account_id}/team/groups/{id}/members",
    ),
];

/// A team user.
#[derive(Debug, Clone)]
pub struct User(Resource);

impl User {
    /// Lists the groups this user belongs to.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error of the first page.
    pub async fn groups(&self, params: ListParams) -> Result<Pager<Group>, ResourceError> {
        let target = self.0.resolve(ResourceOperation::Memberships)?;
        Pager::start(
            Arc::clone(self.0.client()),
            ResourceKind::Group,
            self.0.account_id().cloned(),
            target.path,
            params,
        )
        .await
    }
}

/// A team group.
#[derive(Debug, Clone)]
pub struct Group(Resource);

impl Group {
    /// Lists the users in this group.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error of the first page.
    pub async fn members(&self, params: ListParams) -> Result<Pager<User>, ResourceError> {
        let target = self.0.resolve(ResourceOperation::Members)?;
        Pager::start(
            Arc::clone(self.0.client()),
            ResourceKind::User,
            self.0.account_id().cloned(),
            target.path,
            params,
        )
        .await
    }
}

impl From<Resource> for User {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl ResourceProxy for User {
    fn resource(&self) -> &Resource {
        &self.0
    }

    fn into_resource(self) -> Resource {
        self.0
    }
}

impl Deref for User {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for User {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Resource> for Group {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl ResourceProxy for Group {
    fn resource(&self) -> &Resource {
        &self.0
    }

    fn into_resource(self) -> Resource {
        self.0
    }
}

impl Deref for Group {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Group {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
