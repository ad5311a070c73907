//! Multi-source aggregation
//!
//! Fans a query out to many sources under a concurrency bound and merges the
//! results into one time-ordered sequence.
//!
//! # Overview
//!
//! - Every source gets its own [`PageFetcher`] over a freshly built adapter.
//! - Jobs start only after taking a permit from a counting semaphore, so at
//!   most `max_concurrency` sources are in flight.
//! - Finished jobs send their records to the collector over a channel.
//! - The run always drains every job. If any failed, the first failure is
//!   returned and all records are discarded.

mod types;

pub use types::{AggregateConfig, AggregateStats, QuerySpec};

use crate::error::{Error, Result};
use crate::pagination::{PageAdapter, PageFetcher};
use crate::types::Record;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

type JobResult = (String, Result<Vec<Record>>);

/// Bounded-concurrency aggregator over many record sources
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregateConfig,
}

impl Aggregator {
    /// Create an aggregator with the given configuration
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    /// Fetch every source and return all records sorted by timestamp.
    ///
    /// `make_adapter` builds one adapter per spec; adapters are never shared
    /// between jobs. Records with equal timestamps keep the order in which
    /// their jobs delivered them.
    pub async fn run<A, F>(&self, specs: Vec<QuerySpec>, make_adapter: F) -> Result<Vec<Record>>
    where
        A: PageAdapter<Item = Record> + 'static,
        F: Fn(&QuerySpec) -> A,
    {
        self.run_with_stats(specs, make_adapter)
            .await
            .map(|(records, _)| records)
    }

    /// Like [`Aggregator::run`], also returning run statistics
    pub async fn run_with_stats<A, F>(
        &self,
        specs: Vec<QuerySpec>,
        make_adapter: F,
    ) -> Result<(Vec<Record>, AggregateStats)>
    where
        A: PageAdapter<Item = Record> + 'static,
        F: Fn(&QuerySpec) -> A,
    {
        let start = Instant::now();
        let mut stats = AggregateStats::new();
        stats.sources = specs.len();

        let gate = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<JobResult>();
        let mut handles = Vec::with_capacity(specs.len());

        for spec in specs {
            let permit = Arc::clone(&gate)
                .acquire_owned()
                .await
                .map_err(|e| Error::Other(format!("Admission gate closed: {e}")))?;

            let adapter = make_adapter(&spec);
            let page_size = self.config.default_page_size;
            let tx = tx.clone();

            debug!(source = %spec.source_id, "Dispatching fetch");
            handles.push(tokio::spawn(async move {
                // Held until the job ends, whatever the outcome
                let _permit = permit;
                let mut fetcher = PageFetcher::new(adapter, page_size).with_limit(spec.limit);
                let result = fetcher.all().await;
                // The collector outlives every job
                let _ = tx.send((spec.source_id, result));
            }));
        }
        drop(tx);

        let mut records = Vec::new();
        let mut first_error = None;

        while let Some((source_id, result)) = rx.recv().await {
            match result {
                Ok(batch) => {
                    debug!(source = %source_id, records = batch.len(), "Source complete");
                    stats.add_success(batch.len());
                    records.extend(batch);
                }
                Err(e) => {
                    warn!(source = %source_id, error = %e, "Source failed");
                    stats.add_failure();
                    first_error.get_or_insert(e);
                }
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                stats.add_failure();
                first_error.get_or_insert(Error::Join(e));
            }
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            sources = stats.sources,
            succeeded = stats.succeeded,
            failed = stats.failed,
            records = stats.records,
            duration_ms = stats.duration_ms,
            "Aggregation finished"
        );

        if let Some(e) = first_error {
            return Err(e);
        }

        records.sort_by_key(|r| r.timestamp_millis);
        Ok((records, stats))
    }
}
