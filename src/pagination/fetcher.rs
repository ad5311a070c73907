//! Cursor-driven page fetcher
//!
//! Drives any [`PageAdapter`] page by page under an optional cap on the total
//! number of items.

use super::types::{PageAdapter, PaginationState};
use crate::error::{Error, Result};
use tracing::debug;

/// Generic page fetcher over a single adapter
#[derive(Debug)]
pub struct PageFetcher<A> {
    adapter: A,
    state: PaginationState,
    pages: u32,
}

impl<A: PageAdapter> PageFetcher<A> {
    /// Create a fetcher, applying `default_page_size` if the adapter has none
    pub fn new(mut adapter: A, default_page_size: u32) -> Self {
        if adapter.page_size().is_none() {
            adapter.set_page_size(default_page_size);
        }

        Self {
            adapter,
            state: PaginationState::new(),
            pages: 0,
        }
    }

    /// Cap the total number of items fetched (None = unbounded)
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.state.limit = limit;
        self
    }

    /// Current pagination state
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// The wrapped adapter
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Whether another page can be fetched
    pub fn has_next_page(&self) -> bool {
        self.state.has_next_page()
    }

    /// Fetch the next page.
    ///
    /// Fails with [`Error::NoNextPage`] without contacting the adapter once
    /// the fetcher is exhausted. Adapter errors are returned unchanged.
    pub async fn next_page(&mut self) -> Result<Vec<A::Item>> {
        if !self.has_next_page() {
            return Err(Error::NoNextPage);
        }

        self.adapter.set_cursor(self.state.cursor.clone());

        let remaining = self.state.remaining();
        if remaining == Some(0) {
            // Nothing may be requested: a zero cap yields one empty page
            self.state.advance(0, None);
            return Ok(Vec::new());
        }

        if let Some(remaining) = remaining {
            let budget = u32::try_from(remaining).unwrap_or(u32::MAX);
            let size = self
                .adapter
                .page_size()
                .map_or(budget, |size| size.min(budget));
            self.adapter.set_page_size(size);
        }

        let page = self.adapter.fetch_page().await?;

        let mut items = page.items;
        if let Some(remaining) = remaining {
            let budget = usize::try_from(remaining).unwrap_or(usize::MAX);
            items.truncate(budget);
        }

        self.pages += 1;
        self.state.advance(items.len(), page.next_cursor);

        debug!(
            page = self.pages,
            items = items.len(),
            fetched = self.state.fetched,
            more = self.state.cursor.is_some(),
            "Fetched page"
        );

        Ok(items)
    }

    /// Fetch every remaining page, in order.
    ///
    /// Fails atomically: if any page fails, the items gathered so far are
    /// dropped and the error is returned.
    pub async fn all(&mut self) -> Result<Vec<A::Item>> {
        let mut items = Vec::new();

        while self.has_next_page() {
            let page = self.next_page().await?;
            items.extend(page);
        }

        Ok(items)
    }

    /// Consume the fetcher and return the adapter
    pub fn into_adapter(self) -> A {
        self.adapter
    }
}
