// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # logscope
//!
//! Paged listing, concurrent multi-group search and live tailing for log,
//! table and bucket services reached over HTTP.
//!
//! ## Features
//!
//! - **Generic Pagination**: One driver for every cursor-paged listing, with a total-item limit
//! - **Concurrent Search**: Bounded fan-out across many log groups, merged in time order
//! - **Live Tail**: Batched push subscriptions fanned into one stream
//! - **Time Windows**: Absolute timestamps or relative durations like `2h30m`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use logscope::aggregate::{AggregateConfig, Aggregator, QuerySpec};
//! use logscope::http::{ApiClient, ApiClientConfig};
//! use logscope::sources::LogEventsAdapter;
//!
//! #[tokio::main]
//! async fn main() -> logscope::Result<()> {
//!     let client = ApiClient::new(ApiClientConfig::builder().endpoint("http://localhost:4566").build())?;
//!
//!     let specs = vec![QuerySpec::new("/app/api"), QuerySpec::new("/app/worker")];
//!     let records = Aggregator::new(AggregateConfig::new().with_max_concurrency(2))
//!         .run(specs, |spec| LogEventsAdapter::new(client.clone(), spec))
//!         .await?;
//!
//!     for record in records {
//!         println!("{} {}", record.source_id, record.payload);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        CLI / Runner                          │
//! │   logs list    logs get    logs search    ddb list   s3 list │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴──────────┬─────────────────────┐
//! │  Pagination  │      Aggregate          │       Tail          │
//! ├──────────────┼─────────────────────────┼─────────────────────┤
//! │ PageFetcher  │ Semaphore gate          │ Batches of 10       │
//! │ Limit        │ Channel collector       │ Fan-in channel      │
//! │ Cursor       │ Time-ordered merge      │ Fail-fast           │
//! └──────────────┴─────────────────────────┴─────────────────────┘
//!                               │
//! ┌──────────────────────────────────────────────────────────────┐
//! │            Sources (adapters)  →  ApiClient (HTTP)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types
pub mod types;

/// Generic cursor pagination
pub mod pagination;

/// Concurrent multi-source fetch and merge
pub mod aggregate;

/// Live tail multiplexing
pub mod tail;

/// Time window parsing
pub mod window;

/// JSON-over-HTTP client
pub mod http;

/// Concrete source adapters
pub mod sources;

/// Record and table rendering
pub mod output;

/// Configuration file and profiles
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use aggregate::{Aggregator, QuerySpec};
pub use pagination::{Page, PageAdapter, PageFetcher};
pub use tail::{LiveTail, TailExit, TailMultiplexer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
