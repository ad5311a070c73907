//! Common types used throughout logscope
//!
//! This module contains the record type shared by the aggregator and the
//! live tail, and the listing items returned by the resource adapters
//! (log groups, log streams and buckets).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Record
// ============================================================================

/// A single log record, produced by historical fetches and live tails alike
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier of the source (log group name or ARN)
    pub source_id: String,
    /// Event time in milliseconds since the Unix epoch
    pub timestamp_millis: i64,
    /// Raw event payload
    pub payload: String,
}

impl Record {
    /// Create a new record
    pub fn new(source_id: impl Into<String>, timestamp_millis: i64, payload: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            timestamp_millis,
            payload: payload.into(),
        }
    }

    /// Event time as a UTC datetime, if representable
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_millis).single()
    }
}

// ============================================================================
// Listing Items
// ============================================================================

/// A log group as returned by the group listing API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroup {
    /// Group name
    #[serde(rename = "logGroupName", default)]
    pub name: String,
    /// Group ARN
    #[serde(default)]
    pub arn: Option<String>,
    /// Creation time in epoch milliseconds
    #[serde(default)]
    pub creation_time: Option<i64>,
    /// Retention in days, absent for "never expire"
    #[serde(default)]
    pub retention_in_days: Option<u32>,
    /// Stored bytes
    #[serde(default)]
    pub stored_bytes: Option<u64>,
}

impl LogGroup {
    /// Identifier used for live tail subscriptions.
    ///
    /// The tail API wants ARNs; listings from some endpoints omit them, in
    /// which case the group name is used.
    pub fn tail_identifier(&self) -> &str {
        self.arn
            .as_deref()
            .map_or(self.name.as_str(), |arn| arn.trim_end_matches(":*"))
    }
}

/// A log stream inside a log group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStream {
    /// Stream name
    #[serde(rename = "logStreamName", default)]
    pub name: String,
    /// Creation time in epoch milliseconds
    #[serde(default)]
    pub creation_time: Option<i64>,
    /// Timestamp of the last event in the stream
    #[serde(default)]
    pub last_event_timestamp: Option<i64>,
}

/// A storage bucket as returned by the bucket listing API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket name
    pub name: String,
    /// Creation time, absent when the service omits or garbles it
    pub creation_date: Option<DateTime<Utc>>,
}
