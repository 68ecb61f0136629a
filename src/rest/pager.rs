//! Lazy, restartable pagination over list endpoints.
//!
//! A [`Pager`] fetches the first page when created and further pages only
//! when an index past the buffered range is asked for, or when iteration
//! runs out of buffered items.
//!
//! ```rust,ignore
//! let mut links = account.links().all(ListParams::new().page_size(2)).await?;
//!
//! while let Some(link) = links.next().await? {
//!     println!("{:?}", link.get_str("url"));
//! }
//!
//! links.restart().await?;
//! let third = links.get(2).await?;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::{Query, RestClient};
use crate::config::AccountId;
use crate::rest::response::{Page, PageRequest, PageToken};
use crate::rest::{Resource, ResourceError, ResourceKind, ResourceProxy};

/// Maximum pages a single pager fetches.
const MAX_PAGES: u32 = 1000;

/// Query parameters for list requests.
///
/// Values are forwarded as given; the server validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Items per page.
    pub page_size: Option<u32>,
    /// A single page to fetch. Pins the pager to that page.
    pub page: Option<u32>,
    /// Search query.
    pub q: Option<String>,
    /// Lower bound on the modification time of recent files.
    pub after: Option<String>,
    /// Only active links.
    pub active: Option<bool>,
    /// Additional filters, sent in order.
    pub extra: Query,
}

impl ListParams {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Pins the pager to a single page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the search query.
    #[must_use]
    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Sets the `after` filter.
    #[must_use]
    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Sets the `active` filter.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Adds an arbitrary filter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Returns the query for the first request.
    #[must_use]
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(page_size) = self.page_size {
            query.push(("page_size".to_string(), page_size.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(q) = &self.q {
            query.push(("q".to_string(), q.clone()));
        }
        if let Some(after) = &self.after {
            query.push(("after".to_string(), after.clone()));
        }
        if let Some(active) = self.active {
            query.push(("active".to_string(), active.to_string()));
        }
        query.extend(self.extra.iter().cloned());
        query
    }

    const fn page_request(&self, page: Option<u32>) -> PageRequest {
        let request = PageRequest::new(page, self.page_size);
        if self.page.is_some() {
            request.pinned()
        } else {
            request
        }
    }
}

/// One logical sequence over a paginated listing.
#[derive(Debug)]
pub struct Pager<T = Resource> {
    client: Arc<RestClient>,
    kind: ResourceKind,
    account_id: Option<AccountId>,
    path: String,
    params: ListParams,
    items: Vec<T>,
    first_page_len: usize,
    position: usize,
    next: Option<PageToken>,
    total: Option<u64>,
    pages_fetched: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ResourceProxy> Pager<T> {
    /// Fetches the first page of `path` and returns the pager.
    ///
    /// Items are hydrated as `kind` proxies in `account_id`.
    ///
    /// # Errors
    ///
    /// Returns the API or transport error of the first request, or
    /// [`ResourceError::Decode`] if the body is not a list response.
    pub async fn start(
        client: Arc<RestClient>,
        kind: ResourceKind,
        account_id: Option<AccountId>,
        path: String,
        params: ListParams,
    ) -> Result<Self, ResourceError> {
        let mut pager = Self {
            client,
            kind,
            account_id,
            path,
            params,
            items: Vec::new(),
            first_page_len: 0,
            position: 0,
            next: None,
            total: None,
            pages_fetched: 0,
            _marker: PhantomData,
        };
        pager.fetch(None).await?;
        pager.first_page_len = pager.items.len();
        Ok(pager)
    }

    /// Returns the total reported by the server, if any.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns the items of the first page.
    #[must_use]
    pub fn page(&self) -> &[T] {
        &self.items[..self.first_page_len.min(self.items.len())]
    }

    /// Returns every item fetched so far.
    #[must_use]
    pub fn buffered(&self) -> &[T] {
        &self.items
    }

    /// Returns `true` if a further page can be fetched.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the item at `index`, fetching pages as needed.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed page fetch. Items fetched before the
    /// failure stay buffered.
    pub async fn get(&mut self, index: usize) -> Result<Option<&T>, ResourceError> {
        while index >= self.items.len() && self.has_more() {
            if !self.fetch_next_page().await? {
                break;
            }
        }
        Ok(self.items.get(index))
    }

    /// Returns the next item of the sequence, fetching a page if the buffer
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed page fetch.
    pub async fn next(&mut self) -> Result<Option<T>, ResourceError> {
        let position = self.position;
        let item = self.get(position).await?.cloned();
        if item.is_some() {
            self.position += 1;
        }
        Ok(item)
    }

    /// Fetches the next page into the buffer.
    ///
    /// Returns `false` if there was no further page.
    ///
    /// # Errors
    ///
    /// Returns the error of the failed request.
    pub async fn fetch_next_page(&mut self) -> Result<bool, ResourceError> {
        let Some(token) = self.next.clone() else {
            return Ok(false);
        };
        if self.pages_fetched >= MAX_PAGES {
            warn!(path = %self.path, pages = self.pages_fetched, "Reached page limit; stopping");
            self.next = None;
            return Ok(false);
        }
        self.fetch(Some(token)).await?;
        Ok(true)
    }

    /// Returns the length of the sequence.
    ///
    /// Uses the server's `total` when reported; otherwise fetches every
    /// remaining page and counts.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed page fetch.
    pub async fn len(&mut self) -> Result<usize, ResourceError> {
        if self.params.page.is_none() {
            if let Some(total) = self.total {
                return Ok(usize::try_from(total).unwrap_or(usize::MAX));
            }
        }
        self.fetch_all().await?;
        Ok(self.items.len())
    }

    /// Returns `true` if the sequence has no items.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed page fetch.
    pub async fn is_empty(&mut self) -> Result<bool, ResourceError> {
        Ok(self.get(0).await?.is_none())
    }

    /// Fetches every remaining page and returns all items.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed page fetch.
    pub async fn collect_all(mut self) -> Result<Vec<T>, ResourceError> {
        self.fetch_all().await?;
        Ok(self.items)
    }

    /// Clears the buffer and fetches the first (or pinned) page again.
    ///
    /// # Errors
    ///
    /// Returns the error of the request. The pager is then empty.
    pub async fn restart(&mut self) -> Result<(), ResourceError> {
        self.items.clear();
        self.first_page_len = 0;
        self.position = 0;
        self.next = None;
        self.total = None;
        self.pages_fetched = 0;
        self.fetch(None).await?;
        self.first_page_len = self.items.len();
        Ok(())
    }

    /// Consumes the pager and returns the buffered items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    async fn fetch_all(&mut self) -> Result<(), ResourceError> {
        while self.fetch_next_page().await? {}
        Ok(())
    }

    async fn fetch(&mut self, token: Option<PageToken>) -> Result<(), ResourceError> {
        let mut query = self.params.to_query();
        let page_number = match &token {
            Some(token) => {
                token.apply(&mut query);
                match token {
                    PageToken::Number(n) => Some(*n),
                    PageToken::NextPage(_) | PageToken::Cursor(_) => None,
                }
            }
            None => self.params.page,
        };

        debug!(path = %self.path, page = ?page_number, "Fetching page");

        let response = self
            .client
            .get(&self.path, Some(query))
            .await
            .map_err(|e| ResourceError::from_rest(e, self.kind.name(), None))?;

        let page = Page::from_body(response.body, &self.params.page_request(page_number))
            .map_err(|message| ResourceError::Decode {
                resource: self.kind.name(),
                message,
            })?;

        self.pages_fetched += 1;
        self.total = page.total.or(self.total);
        self.next = page.next.clone();

        let client = &self.client;
        let kind = self.kind;
        let account_id = &self.account_id;
        self.items.extend(page.into_iter().map(|fields| {
            T::from(Resource::from_server(
                Arc::clone(client),
                kind,
                account_id.clone(),
                fields,
            ))
        }));
        Ok(())
    }
}
