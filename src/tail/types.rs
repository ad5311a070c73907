//! Live tail types and traits

use crate::error::Result;
use crate::types::Record;
use async_trait::async_trait;

/// Maximum number of source identifiers a single subscription accepts
pub const MAX_BATCH_SIZE: usize = 10;

/// An ordered group of source identifiers bound to one subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailBatch {
    /// Position of this batch in the partition
    pub index: usize,
    /// Source identifiers, in original order
    pub identifiers: Vec<String>,
}

impl TailBatch {
    /// Split identifiers into consecutive batches of at most `size`.
    ///
    /// `size` is clamped to `1..=MAX_BATCH_SIZE`.
    pub fn partition(identifiers: &[String], size: usize) -> Vec<TailBatch> {
        identifiers
            .chunks(size.clamp(1, MAX_BATCH_SIZE))
            .enumerate()
            .map(|(index, chunk)| TailBatch {
                index,
                identifiers: chunk.to_vec(),
            })
            .collect()
    }

    /// Number of identifiers in this batch
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// An event received on a live subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    /// The subscription session started
    SessionStart {
        /// Session identifier
        session_id: String,
    },
    /// New records matched the subscription
    SessionUpdate {
        /// Records in delivery order
        records: Vec<Record>,
    },
}

/// Push-based event stream of one open subscription
#[async_trait]
pub trait EventStream: Send {
    /// Wait for the next event.
    ///
    /// `Ok(None)` means the stream ended cleanly; an error is terminal.
    async fn next_event(&mut self) -> Result<Option<TailEvent>>;
}

/// Opens live subscriptions for batches of sources
#[async_trait]
pub trait TailSource: Send + Sync {
    /// Open one subscription covering every identifier in `batch`
    async fn open(
        &self,
        batch: &TailBatch,
        filter_pattern: Option<&str>,
    ) -> Result<Box<dyn EventStream>>;
}
