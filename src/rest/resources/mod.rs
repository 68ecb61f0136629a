//! Kind-specific resources.
//!
//! Each module declares the path table of one endpoint family and, where
//! the family has operations beyond create/retrieve/update/delete, a typed
//! view over [`Resource`](crate::rest::Resource) carrying them:
//!
//! | Module      | Views               | Extra operations                          |
//! |-------------|---------------------|-------------------------------------------|
//! | `account`   | [`Account`]         | sub-collections                           |
//! | `file`      | [`File`]            | contents, copy, properties, upload        |
//! | `folder`    | [`Folder`]          | contents, copy, root                      |
//! | `link`      |                     | [`LinkParams`] for creation               |
//! | `team`      | [`User`], [`Group`] | memberships, members                      |
//! | `event`     |                     | latest cursor                             |
//! | `crm`       |                     | one table for every [`CrmObject`](crate::rest::CrmObject) |
//! | `property`  | [`Property`]        | list, patch, clear                        |

pub(crate) mod account;
pub(crate) mod crm;
pub(crate) mod event;
pub(crate) mod file;
pub(crate) mod folder;
pub(crate) mod link;
mod property;
pub(crate) mod team;

pub use account::Account;
pub use file::File;
pub use folder::{Folder, ROOT_FOLDER_ID};
pub use link::LinkParams;
pub use property::{Property, PropertyCollection, PropertyUpdate};
pub use team::{Group, User};
