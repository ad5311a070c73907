//! Pagination module
//!
//! Generic cursor pagination over any paged listing API.
//!
//! # Overview
//!
//! Each listing API implements [`PageAdapter`] once. A [`PageFetcher`] owns an
//! adapter, feeds it the cursor returned by the previous page, shrinks the
//! requested page size so a capped fetch never over-reads, and reports when
//! the listing is exhausted.

mod fetcher;
mod types;

pub use fetcher::PageFetcher;
pub use types::{Page, PageAdapter, PaginationState};

#[cfg(test)]
mod tests;
