//! Shared links.
//!
//! Links use the generic [`Resource`](crate::rest::Resource) proxy; this
//! module adds the path table and [`LinkParams`] for creation.
//!
//! ```rust,ignore
//! let link = account
//!     .links()
//!     .create(&LinkParams::new(file.id().unwrap()).direct(true))
//!     .await?;
//! assert_eq!(link.get_str("file_id"), file.id().as_deref());
//! ```

use serde::Serialize;

use crate::clients::HttpMethod;
use crate::rest::{ResourceOperation, ResourcePath};

pub(crate) const PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::List,
        &["account_id"],
        "accounts/{account_id}/storage/links",
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Create,
        &["account_id"],
        "accounts/{account_id}/storage/links",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Retrieve,
        &["account_id", "id"],
        "accounts/{account_id}/storage/links/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Patch,
        ResourceOperation::Update,
        &["account_id", "id"],
        "accounts/{account_id}/storage/links/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Delete,
        ResourceOperation::Delete,
        &["account_id", "id"],
        "accounts/{account_id}/storage/links/{id}",
    ),
];

/// Parameters for creating a link.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LinkParams {
    /// The file to link to.
    pub file_id: String,
    /// Link straight to the file contents instead of a preview page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<bool>,
    /// Password required to open the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// ISO 8601 expiry time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    /// Whether the link is usable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl LinkParams {
    /// Creates parameters for a link to `file_id`.
    #[must_use]
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            ..Self::default()
        }
    }

    /// Sets `direct`.
    #[must_use]
    pub const fn direct(mut self, direct: bool) -> Self {
        self.direct = Some(direct);
        self
    }

    /// Sets `password`.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets `expiration`.
    #[must_use]
    pub fn expiration(mut self, expiration: impl Into<String>) -> Self {
        self.expiration = Some(expiration.into());
        self
    }

    /// Sets `active`.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_params_skip_unset_fields() {
        let params = LinkParams::new("F1");
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"file_id": "F1"}));

        let params = LinkParams::new("F1")
            .direct(true)
            .password("testytest")
            .expiration("2030-01-01T00:00:00")
            .active(false);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "file_id": "F1",
                "direct": true,
                "password": "testytest",
                "expiration": "2030-01-01T00:00:00",
                "active": false
            })
        );
    }
}
