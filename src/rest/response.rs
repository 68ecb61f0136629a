//! List responses.
//!
//! Kloudless list endpoints wrap their items in an envelope:
//!
//! ```json
//! {"objects": [...], "count": 2, "total": 10, "page": 1, "next_page": 2}
//! ```
//!
//! Not every endpoint sends every key. Some report `next_page`, the events
//! endpoint reports a `cursor` and `remaining`, and some only report
//! `total`. [`Page::from_body`] reads whatever is present and decides
//! whether a further page exists and how to ask for it.
//!
//! `Page<T>` implements `Deref<Target = [T]>`:
//!
//! ```rust
//! use kloudless::rest::{Page, PageRequest};
//! use serde_json::json;
//!
//! let body = json!({"objects": [{"id": "a"}, {"id": "b"}], "total": 5, "page": 1});
//! let page = Page::from_body(body, &PageRequest::new(Some(1), Some(2))).unwrap();
//!
//! assert_eq!(page.len(), 2);
//! assert_eq!(page.total, Some(5));
//! assert!(page.has_more());
//! ```

use std::ops::Deref;

use serde_json::{Map, Value};

use crate::clients::Query;

/// Page size assumed when the caller did not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// How to ask the server for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// A numeric page, sent as `page=n`.
    Number(u32),
    /// An opaque page token from `next_page`, sent as `page=token`.
    NextPage(String),
    /// An event cursor, sent as `cursor=c`.
    Cursor(String),
}

impl PageToken {
    /// Returns the query parameter that requests this page.
    #[must_use]
    pub fn query_param(&self) -> (String, String) {
        match self {
            Self::Number(page) => ("page".to_string(), page.to_string()),
            Self::NextPage(token) => ("page".to_string(), token.clone()),
            Self::Cursor(cursor) => ("cursor".to_string(), cursor.clone()),
        }
    }

    /// Appends this token to `query`, replacing any earlier page or cursor.
    pub fn apply(&self, query: &mut Query) {
        let (key, value) = self.query_param();
        query.retain(|(k, _)| k != &key);
        query.push((key, value));
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Self::Number),
            Value::String(s) if !s.is_empty() => Some(Self::NextPage(s.clone())),
            _ => None,
        }
    }
}

/// What the caller asked for when a page was fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// The page number requested, if numeric.
    pub page: Option<u32>,
    /// The page size requested.
    pub page_size: Option<u32>,
    /// The caller asked for one specific page; never report a next one.
    pub pinned: bool,
}

impl PageRequest {
    /// Creates a request for a numbered page.
    #[must_use]
    pub const fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page,
            page_size,
            pinned: false,
        }
    }

    /// Returns a copy that never reports a next page.
    #[must_use]
    pub const fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

/// One page of a list response.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages, if the server reported it.
    pub total: Option<u64>,
    /// The page number, if the listing is numbered.
    pub page: Option<u32>,
    /// How to fetch the following page; `None` on the last page.
    pub next: Option<PageToken>,
}

impl Page<Map<String, Value>> {
    /// Parses a list response body.
    ///
    /// A bare JSON array is accepted as a single, final page.
    ///
    /// # Errors
    ///
    /// Returns a message if the body has no `objects` array or an entry is
    /// not a JSON object.
    pub fn from_body(body: Value, request: &PageRequest) -> Result<Self, String> {
        let (objects, envelope) = match body {
            Value::Array(objects) => (objects, Map::new()),
            Value::Object(mut envelope) => match envelope.remove("objects") {
                Some(Value::Array(objects)) => (objects, envelope),
                Some(other) => {
                    return Err(format!("expected 'objects' to be an array, got {other}"));
                }
                None => return Err("response has no 'objects' array".to_string()),
            },
            other => return Err(format!("expected a list response, got {other}")),
        };

        let items = objects
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(format!("expected an object in 'objects', got {other}")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = envelope.get("total").and_then(Value::as_u64);
        let page = envelope
            .get("page")
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok())
            .or(request.page);

        let next = if request.pinned || items.is_empty() {
            None
        } else {
            next_token(&envelope, items.len(), total, page, request.page_size)
        };

        Ok(Self {
            items,
            total,
            page,
            next,
        })
    }
}

fn next_token(
    envelope: &Map<String, Value>,
    item_count: usize,
    total: Option<u64>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Option<PageToken> {
    if let Some(next_page) = envelope.get("next_page") {
        return PageToken::from_value(next_page);
    }

    if let Some(cursor) = envelope.get("cursor") {
        let cursor = match cursor {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let more = match envelope.get("remaining") {
            Some(Value::Bool(remaining)) => *remaining,
            Some(Value::Number(remaining)) => remaining.as_f64().is_some_and(|r| r > 0.0),
            _ => true,
        };
        return more.then_some(PageToken::Cursor(cursor));
    }

    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let has_more = match total {
        Some(total) => u64::from(page) * u64::from(page_size) < total,
        None => item_count >= page_size as usize,
    };
    if !has_more {
        return None;
    }
    page.checked_add(1).map(PageToken::Number)
}

impl<T> Page<T> {
    /// Returns `true` if a further page exists.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Maps the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            next: self.next,
        }
    }

    /// Consumes the page and returns its items.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for Page<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn objects(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"id": i.to_string()})).collect()
    }

    #[test]
    fn test_next_page_number_is_followed() {
        let body = json!({"objects": objects(2), "count": 2, "page": 1, "next_page": 2});
        let page = Page::from_body(body, &PageRequest::default()).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.next, Some(PageToken::Number(2)));
    }

    #[test]
    fn test_null_next_page_ends_listing() {
        let body = json!({"objects": objects(100), "page": 1, "next_page": null});
        let page = Page::from_body(body, &PageRequest::default()).unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_string_next_page_is_opaque_token() {
        let body = json!({"objects": objects(1), "next_page": "abc=="});
        let page = Page::from_body(body, &PageRequest::default()).unwrap();
        assert_eq!(page.next, Some(PageToken::NextPage("abc==".to_string())));
        assert_eq!(
            page.next.unwrap().query_param(),
            ("page".to_string(), "abc==".to_string())
        );
    }

    #[test]
    fn test_cursor_with_remaining() {
        let body = json!({"objects": objects(3), "cursor": "c2", "remaining": 4});
        let page = Page::from_body(body, &PageRequest::default()).unwrap();
        assert_eq!(page.next, Some(PageToken::Cursor("c2".to_string())));

        let body = json!({"objects": objects(3), "cursor": 17, "remaining": 0});
        let page = Page::from_body(body, &PageRequest::default()).unwrap();
        assert!(!page.has_more());

        let body = json!({"objects": objects(3), "cursor": "c3", "remaining": false});
        let page = Page::from_body(body, &PageRequest::default()).unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_total_decides_when_no_token() {
        let request = PageRequest::new(Some(1), Some(2));
        let body = json!({"objects": objects(2), "total": 5});
        let page = Page::from_body(body, &request).unwrap();
        assert_eq!(page.next, Some(PageToken::Number(2)));

        let request = PageRequest::new(Some(3), Some(2));
        let body = json!({"objects": objects(1), "total": 5, "page": 3});
        let page = Page::from_body(body, &request).unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_short_page_without_total_is_last() {
        let request = PageRequest::new(None, Some(10));
        let page = Page::from_body(json!({"objects": objects(3)}), &request).unwrap();
        assert!(!page.has_more());

        let page = Page::from_body(json!({"objects": objects(10)}), &request).unwrap();
        assert_eq!(page.next, Some(PageToken::Number(2)));
    }

    #[test]
    fn test_pinned_page_never_continues() {
        let request = PageRequest::new(Some(2), Some(1)).pinned();
        let body = json!({"objects": objects(1), "page": 2, "next_page": 3, "total": 40});
        let page = Page::from_body(body, &request).unwrap();
        assert!(!page.has_more());
        assert_eq!(page.page, Some(2));
        assert_eq!(page.total, Some(40));
    }

    #[test]
    fn test_last_representable_page_ends_listing() {
        let request = PageRequest::new(None, Some(2));
        let body = json!({"objects": objects(2), "page": u32::MAX});
        let page = Page::from_body(body, &request).unwrap();
        assert_eq!(page.page, Some(u32::MAX));
        assert!(!page.has_more());
    }

    #[test]
    fn test_empty_page_is_last() {
        let body = json!({"objects": [], "next_page": 2});
        let page = Page::from_body(body, &PageRequest::default()).unwrap();
        assert!(page.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_bare_array_is_single_page() {
        let page = Page::from_body(json!([{"id": "a"}]), &PageRequest::default()).unwrap();
        assert_eq!(page.len(), 1);
        assert!(page.total.is_none());
    }

    #[test]
    fn test_malformed_bodies_are_rejected() {
        assert!(Page::from_body(json!({"count": 0}), &PageRequest::default()).is_err());
        assert!(Page::from_body(json!({"objects": {}}), &PageRequest::default()).is_err());
        assert!(Page::from_body(json!({"objects": [1]}), &PageRequest::default()).is_err());
        assert!(Page::from_body(json!("nope"), &PageRequest::default()).is_err());
    }

    #[test]
    fn test_apply_replaces_previous_token() {
        let mut query = vec![
            ("page_size".to_string(), "2".to_string()),
            ("page".to_string(), "1".to_string()),
        ];
        PageToken::Number(2).apply(&mut query);
        assert_eq!(
            query,
            vec![
                ("page_size".to_string(), "2".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_map_keeps_metadata() {
        let body = json!({"objects": objects(2), "total": 2});
        let page = Page::from_body(body, &PageRequest::default())
            .unwrap()
            .map(|m| m["id"].as_str().unwrap_or_default().to_string());
        assert_eq!(page.into_inner(), vec!["0".to_string(), "1".to_string()]);
    }
}
