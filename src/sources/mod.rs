//! Concrete source adapters
//!
//! Paged listing adapters for the log, table and bucket services, and the
//! HTTP live tail source.
//!
//! # Overview
//!
//! | Adapter | Item | Default page size |
//! |---------|------|-------------------|
//! | [`LogGroupsAdapter`] | [`LogGroup`](crate::types::LogGroup) | 50 |
//! | [`LogStreamsAdapter`] | [`LogStream`](crate::types::LogStream) | 50 |
//! | [`LogEventsAdapter`] | [`Record`](crate::types::Record) | 10000 |
//! | [`TablesAdapter`] | table name | 100 |
//! | [`BucketsAdapter`] | [`Bucket`](crate::types::Bucket) | 1000 |
//!
//! Adapters start without a page size; [`PageFetcher`](crate::pagination::PageFetcher)
//! applies the default given at construction.

mod buckets;
mod live;
mod logs;
mod tables;

pub use buckets::{BucketsAdapter, DEFAULT_BUCKETS_PAGE_SIZE};
pub use live::{HttpTailSource, NdjsonEventStream};
pub use logs::{
    GroupFilter, LogEventsAdapter, LogGroupsAdapter, LogStreamsAdapter, DEFAULT_EVENTS_PAGE_SIZE,
    DEFAULT_GROUPS_PAGE_SIZE, DEFAULT_STREAMS_PAGE_SIZE,
};
pub use tables::{TablesAdapter, DEFAULT_TABLES_PAGE_SIZE};
