//! Live tail multiplexing
//!
//! Tails many sources at once through batched subscriptions and fans every
//! received record into one channel.
//!
//! # Overview
//!
//! - Sources are split into batches of at most [`MAX_BATCH_SIZE`].
//! - Subscriptions are opened one after another, each then running in its
//!   own task.
//! - Records arrive in per-session delivery order; there is no global sort.
//! - An error on any subscription ends the whole tail.

mod types;

pub use types::{EventStream, TailBatch, TailEvent, TailSource, MAX_BATCH_SIZE};

use crate::error::Result;
use crate::types::Record;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Opens batched subscriptions against a [`TailSource`]
#[derive(Debug)]
pub struct TailMultiplexer<S> {
    source: S,
    batch_size: usize,
}

impl<S: TailSource> TailMultiplexer<S> {
    /// Create a multiplexer using the maximum batch size
    pub fn new(source: S) -> Self {
        Self {
            source,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Use smaller batches (clamped to `1..=MAX_BATCH_SIZE`)
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Open one subscription per batch and start fanning records in.
    ///
    /// If any subscription fails to open, those already running are stopped
    /// and the error is returned.
    pub async fn start(
        &self,
        identifiers: &[String],
        filter_pattern: Option<&str>,
    ) -> Result<LiveTail> {
        let batches = TailBatch::partition(identifiers, self.batch_size);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut tail = LiveTail {
            rx,
            tasks: Vec::with_capacity(batches.len()),
            failed: false,
        };

        for batch in batches {
            let stream = self.source.open(&batch, filter_pattern).await?;
            info!(
                batch = batch.index,
                sources = batch.len(),
                "Live tail subscription opened"
            );
            tail.tasks
                .push(tokio::spawn(run_subscription(batch, stream, tx.clone())));
        }

        Ok(tail)
    }
}

/// Drive one subscription until it ends, fails, or the receiver goes away
async fn run_subscription(
    batch: TailBatch,
    mut stream: Box<dyn EventStream>,
    tx: mpsc::UnboundedSender<Result<Record>>,
) {
    loop {
        match stream.next_event().await {
            Ok(Some(TailEvent::SessionStart { session_id })) => {
                info!(batch = batch.index, session = %session_id, "Live tail session started");
            }
            Ok(Some(TailEvent::SessionUpdate { records })) => {
                for record in records {
                    if tx.send(Ok(record)).is_err() {
                        return;
                    }
                }
            }
            Ok(None) => {
                debug!(batch = batch.index, "Live tail subscription ended");
                return;
            }
            Err(e) => {
                warn!(batch = batch.index, error = %e, "Live tail subscription failed");
                let _ = tx.send(Err(e));
                return;
            }
        }
    }
}

/// How [`LiveTail::drain_until`] finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailExit {
    /// Every subscription ended
    Ended,
    /// The shutdown future completed first
    Interrupted,
}

/// Handle on a running live tail.
///
/// Dropping it stops every subscription.
#[derive(Debug)]
pub struct LiveTail {
    rx: mpsc::UnboundedReceiver<Result<Record>>,
    tasks: Vec<JoinHandle<()>>,
    failed: bool,
}

impl LiveTail {
    /// Wait for the next record.
    ///
    /// Returns `None` once every subscription has ended. A subscription error
    /// is returned once, stops all other subscriptions, and is followed by
    /// `None`.
    pub async fn next(&mut self) -> Option<Result<Record>> {
        if self.failed {
            return None;
        }

        let item = self.rx.recv().await?;
        if item.is_err() {
            self.failed = true;
            self.stop();
        }
        Some(item)
    }

    /// Hand every record to `emit` until the tail ends or `shutdown`
    /// completes.
    ///
    /// `shutdown` is polled as a single future across the whole run, so a
    /// signal that fires while `emit` is running is seen on the next turn.
    /// Errors from a subscription or from `emit` end the drain.
    pub async fn drain_until<F, E>(&mut self, shutdown: F, mut emit: E) -> Result<TailExit>
    where
        F: Future,
        E: FnMut(Record) -> Result<()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                item = self.next() => match item {
                    Some(Ok(record)) => emit(record)?,
                    Some(Err(e)) => return Err(e),
                    None => return Ok(TailExit::Ended),
                },
                _ = &mut shutdown => {
                    self.stop();
                    return Ok(TailExit::Interrupted);
                }
            }
        }
    }

    /// Number of open subscriptions
    pub fn subscriptions(&self) -> usize {
        self.tasks.len()
    }

    /// Stop every subscription
    pub fn stop(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl Drop for LiveTail {
    fn drop(&mut self) {
        self.stop();
    }
}
