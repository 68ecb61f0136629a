//! CRM objects.
//!
//! Every CRM family shares one table; `{crm_object}` is filled from the
//! [`CrmObject`](crate::rest::CrmObject) of the resource kind.

use crate::clients::HttpMethod;
use crate::rest::{ResourceOperation, ResourcePath};

pub(crate) const PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::List,
        &["account_id", "crm_object"],
        "accounts/{account_id}/crm/{crm_object}",
    ),
    ResourcePath::new(
        HttpMethod::Post,
        ResourceOperation::Create,
        &["account_id", "crm_object"],
        "accounts/{account_id}/crm/{crm_object}",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::Retrieve,
        &["account_id", "crm_object", "id"],
        "accounts/{account_id}/crm/{crm_object}/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Patch,
        ResourceOperation::Update,
        &["account_id", "crm_object", "id"],
        "accounts/{account_id}/crm/{crm_object}/{id}",
    ),
    ResourcePath::new(
        HttpMethod::Delete,
        ResourceOperation::Delete,
        &["account_id", "crm_object", "id"],
        "accounts/{account_id}/crm/{crm_object}/{id}",
    ),
];
