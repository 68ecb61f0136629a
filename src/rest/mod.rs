//! REST resource infrastructure for the Kloudless API.
//!
//! - **[`Resource`]**: a proxy for one remote entity, with dirty tracking
//! - **[`Collection`]**: a listing endpoint scoped to an account
//! - **[`Pager`]**: a lazy, restartable sequence over a paginated listing
//! - **[`Page`]**: one parsed list response
//! - **[`ResourceKind`]**: the endpoint family, which owns the path table
//! - **[`ResourceError`]**: the caller-facing error taxonomy
//!
//! Kind-specific views and operations (files, folders, links, team, CRM)
//! live in [`resources`].
//!
//! # Example
//!
//! ```rust,ignore
//! use kloudless::{Kloudless, KloudlessConfig};
//! use kloudless::rest::ListParams;
//!
//! let kloudless = Kloudless::new(&KloudlessConfig::from_env()?)?;
//! let account = kloudless.account("832496".parse()?);
//!
//! let mut recent = account.recent().all(ListParams::new().page_size(10)).await?;
//! println!("{:?} recent files", recent.total());
//!
//! while let Some(item) = recent.next().await? {
//!     println!("{} {:?}", item.kind(), item.get_str("name"));
//! }
//! ```

mod collection;
mod errors;
mod kind;
mod pager;
mod path;
mod resource;
mod response;
mod tracking;

pub mod resources;

pub use collection::Collection;
pub use errors::{ApiError, ResourceError};
pub use kind::{resolve_path, CrmObject, ResolvedPath, ResourceKind};
pub use pager::{ListParams, Pager};
pub use path::{build_path, get_path, ResourceOperation, ResourcePath};
pub use resource::{Resource, ResourceProxy};
pub use response::{Page, PageRequest, PageToken, DEFAULT_PAGE_SIZE};
pub use tracking::TrackedFields;
