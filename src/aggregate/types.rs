//! Aggregator types
//!
//! Per-source query specifications, aggregator configuration and run
//! statistics.

use crate::window::TimeWindow;

/// Request parameters for one source, consumed once per job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    /// Source identifier (e.g. log group name)
    pub source_id: String,
    /// Content filter pattern
    pub filter_pattern: Option<String>,
    /// Time window to query
    pub window: TimeWindow,
    /// Cap on records fetched from this source (None = unbounded)
    pub limit: Option<u32>,
}

impl QuerySpec {
    /// Create a spec for a source with no filter, window or limit
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Default::default()
        }
    }

    /// Set the filter pattern. Empty patterns are dropped.
    #[must_use]
    pub fn with_filter(mut self, pattern: Option<String>) -> Self {
        self.filter_pattern = pattern.filter(|p| !p.is_empty());
        self
    }

    /// Set the time window
    #[must_use]
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// Set the per-source limit
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }
}

/// Configuration for an aggregation run
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Maximum number of sources fetched at the same time
    pub max_concurrency: usize,
    /// Page size applied to adapters that have none
    pub default_page_size: u32,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            default_page_size: 10_000,
        }
    }
}

impl AggregateConfig {
    /// Create a new aggregate config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency bound (values below 1 are raised to 1)
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    /// Set the default page size
    #[must_use]
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }
}

/// Statistics from an aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// Sources dispatched
    pub sources: usize,
    /// Sources fetched successfully
    pub succeeded: usize,
    /// Sources that failed
    pub failed: usize,
    /// Records collected
    pub records: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl AggregateStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful source
    pub fn add_success(&mut self, records: usize) {
        self.succeeded += 1;
        self.records += records;
    }

    /// Record a failed source
    pub fn add_failure(&mut self) {
        self.failed += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
