//! Live tail over a streamed HTTP response
//!
//! The tail operation answers with newline-delimited JSON, one event per
//! line, for as long as the session stays open.

use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::tail::{EventStream, TailBatch, TailEvent, TailSource};
use crate::types::Record;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) const START_LIVE_TAIL: &str = "Logs_20140328.StartLiveTail";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartLiveTailInput<'a> {
    log_group_identifiers: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    log_event_filter_pattern: Option<&'a str>,
}

// ============================================================================
// Wire Events
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(default)]
    session_start: Option<WireSessionStart>,
    #[serde(default)]
    session_update: Option<WireSessionUpdate>,
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSessionStart {
    #[serde(default)]
    session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSessionUpdate {
    #[serde(default)]
    session_results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    #[serde(default)]
    log_group_identifier: String,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    message: String,
}

/// Decode one line. Blank lines and unknown event kinds yield `None`.
fn decode_line(line: &[u8]) -> Result<Option<TailEvent>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(None);
    }

    let event: WireEvent = serde_json::from_slice(line)
        .map_err(|e| Error::stream(format!("malformed live tail event: {e}")))?;

    if let Some(kind) = event.kind.or(event.error) {
        let message = event.message.unwrap_or_default();
        return Err(Error::stream(format!("{kind}: {message}")));
    }

    if let Some(start) = event.session_start {
        return Ok(Some(TailEvent::SessionStart {
            session_id: start.session_id,
        }));
    }

    if let Some(update) = event.session_update {
        let records = update
            .session_results
            .into_iter()
            .map(|r| Record::new(r.log_group_identifier, r.timestamp, r.message))
            .collect();
        return Ok(Some(TailEvent::SessionUpdate { records }));
    }

    debug!("Skipping unrecognised live tail event");
    Ok(None)
}

// ============================================================================
// Event Stream
// ============================================================================

/// Splits a byte stream into lines and decodes each as a [`TailEvent`]
pub struct NdjsonEventStream {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    buffer: BytesMut,
    finished: bool,
}

impl NdjsonEventStream {
    /// Wrap a response body
    pub fn new(response: reqwest::Response) -> Self {
        Self::from_stream(response.bytes_stream())
    }

    pub(crate) fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
    {
        Self {
            body: stream.boxed(),
            buffer: BytesMut::new(),
            finished: false,
        }
    }
}

#[async_trait]
impl EventStream for NdjsonEventStream {
    async fn next_event(&mut self) -> Result<Option<TailEvent>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
                let line = self.buffer.split_to(pos + 1);
                if let Some(event) = decode_line(&line)? {
                    return Ok(Some(event));
                }
                continue;
            }

            if self.finished {
                // Trailing line without a newline
                let rest = self.buffer.split();
                return decode_line(&rest);
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(Error::stream(format!("connection lost: {e}"))),
                None => self.finished = true,
            }
        }
    }
}

// ============================================================================
// Tail Source
// ============================================================================

/// Opens live tail sessions through the log service
#[derive(Debug, Clone)]
pub struct HttpTailSource {
    client: ApiClient,
}

impl HttpTailSource {
    /// Create a tail source using `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TailSource for HttpTailSource {
    async fn open(
        &self,
        batch: &TailBatch,
        filter_pattern: Option<&str>,
    ) -> Result<Box<dyn EventStream>> {
        let input = StartLiveTailInput {
            log_group_identifiers: &batch.identifiers,
            log_event_filter_pattern: filter_pattern.filter(|p| !p.is_empty()),
        };

        let response = self.client.call_streaming(START_LIVE_TAIL, &input).await?;
        Ok(Box::new(NdjsonEventStream::new(response)))
    }
}
