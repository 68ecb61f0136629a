//! Activity events.
//!
//! The events listing is cursor based: each page carries a `cursor` and the
//! number of events `remaining`. Start from a known cursor with
//! `ListParams::new().param("cursor", c)`, or from
//! [`Collection::latest_cursor`](crate::rest::Collection::latest_cursor)
//! to receive only events that happen afterwards.

use crate::clients::HttpMethod;
use crate::rest::{ResourceOperation, ResourcePath};

pub(crate) const PATHS: &[ResourcePath] = &[
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::List,
        &["account_id"],
        "accounts/{account_id}/events",
    ),
    ResourcePath::new(
        HttpMethod::Get,
        ResourceOperation::LatestCursor,
        &["account_id"],
        "accounts/{account_id}/events/latest",
    ),
];
