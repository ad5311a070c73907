//! Pagination types and traits
//!
//! Defines the adapter capability every paged listing API implements, and
//! the state the fetcher tracks while driving one.

use crate::error::Result;
use async_trait::async_trait;

/// One page returned by an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in this page, in API order
    pub items: Vec<T>,
    /// Continuation token for the next page, if any
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a page with a continuation token
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Create a terminal page (no continuation)
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// Per-API paging capability driven by [`PageFetcher`](super::PageFetcher).
///
/// An adapter owns its request parameters. The fetcher sets the cursor and
/// page size before each call; the adapter issues exactly one request per
/// `fetch_page` and reports what came back.
#[async_trait]
pub trait PageAdapter: Send {
    /// Item type produced by this API
    type Item: Send;

    /// Issue one page request with the current parameters
    async fn fetch_page(&mut self) -> Result<Page<Self::Item>>;

    /// Currently requested page size, if one is configured
    fn page_size(&self) -> Option<u32>;

    /// Set the requested page size
    fn set_page_size(&mut self, size: u32);

    /// Set the continuation token for the next request
    fn set_cursor(&mut self, cursor: Option<String>);
}

/// Tracks pagination progress for a single fetcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Cap on cumulative fetched items (None = unbounded)
    pub limit: Option<u32>,
    /// Items fetched so far
    pub fetched: u64,
    /// Cursor returned by the last page
    pub cursor: Option<String>,
    /// Whether the first page has been fetched
    pub started: bool,
}

impl PaginationState {
    /// Create a new, unbounded pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state bounded to `limit` items
    pub fn with_limit(limit: Option<u32>) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Whether another page may be requested
    pub fn has_next_page(&self) -> bool {
        !self.started || (self.cursor.is_some() && !self.limit_reached())
    }

    /// Whether the item cap has been hit
    pub fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.fetched >= u64::from(limit))
    }

    /// Items still allowed before hitting the cap (None = unbounded)
    pub fn remaining(&self) -> Option<u64> {
        self.limit
            .map(|limit| u64::from(limit).saturating_sub(self.fetched))
    }

    /// Record a fetched page
    pub(crate) fn advance(&mut self, count: usize, cursor: Option<String>) {
        self.started = true;
        self.fetched += count as u64;
        // Some APIs signal the last page with an empty token
        self.cursor = cursor.filter(|c| !c.is_empty());
    }
}
