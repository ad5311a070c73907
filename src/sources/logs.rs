//! Log service adapters
//!
//! Paged listings of log groups, log streams and filtered log events.

use crate::aggregate::QuerySpec;
use crate::error::Result;
use crate::http::ApiClient;
use crate::pagination::{Page, PageAdapter};
use crate::types::{LogGroup, LogStream, Record};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) const DESCRIBE_LOG_GROUPS: &str = "Logs_20140328.DescribeLogGroups";
pub(crate) const DESCRIBE_LOG_STREAMS: &str = "Logs_20140328.DescribeLogStreams";
pub(crate) const FILTER_LOG_EVENTS: &str = "Logs_20140328.FilterLogEvents";

/// Page size used for group listings when none is configured
pub const DEFAULT_GROUPS_PAGE_SIZE: u32 = 50;

/// Page size used for stream listings when none is configured
pub const DEFAULT_STREAMS_PAGE_SIZE: u32 = 50;

/// Page size used for event queries when none is configured
pub const DEFAULT_EVENTS_PAGE_SIZE: u32 = 10_000;

// ============================================================================
// Log Groups
// ============================================================================

/// Name filter for group listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    /// Every group
    #[default]
    All,
    /// Groups whose name starts with the value
    Prefix(String),
    /// Groups whose name contains the value
    Pattern(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeLogGroupsInput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    log_group_name_prefix: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_group_name_pattern: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeLogGroupsOutput {
    #[serde(default)]
    log_groups: Vec<LogGroup>,
    #[serde(default)]
    next_token: Option<String>,
}

/// Lists log groups
#[derive(Debug)]
pub struct LogGroupsAdapter {
    client: ApiClient,
    filter: GroupFilter,
    page_size: Option<u32>,
    cursor: Option<String>,
}

impl LogGroupsAdapter {
    /// List every group
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            filter: GroupFilter::All,
            page_size: None,
            cursor: None,
        }
    }

    /// Restrict the listing by name
    #[must_use]
    pub fn with_filter(mut self, filter: GroupFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[async_trait]
impl PageAdapter for LogGroupsAdapter {
    type Item = LogGroup;

    async fn fetch_page(&mut self) -> Result<Page<LogGroup>> {
        let (prefix, pattern) = match &self.filter {
            GroupFilter::All => (None, None),
            GroupFilter::Prefix(p) => (Some(p.as_str()), None),
            GroupFilter::Pattern(p) => (None, Some(p.as_str())),
        };
        let input = DescribeLogGroupsInput {
            log_group_name_prefix: prefix,
            log_group_name_pattern: pattern,
            limit: self.page_size,
            next_token: self.cursor.as_deref(),
        };

        let output: DescribeLogGroupsOutput = self.client.call(DESCRIBE_LOG_GROUPS, &input).await?;
        Ok(Page::new(output.log_groups, output.next_token))
    }

    fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    fn set_page_size(&mut self, size: u32) {
        self.page_size = Some(size);
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}

// ============================================================================
// Log Streams
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeLogStreamsInput<'a> {
    log_group_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeLogStreamsOutput {
    #[serde(default)]
    log_streams: Vec<LogStream>,
    #[serde(default)]
    next_token: Option<String>,
}

/// Lists the streams of one log group
#[derive(Debug)]
pub struct LogStreamsAdapter {
    client: ApiClient,
    group: String,
    page_size: Option<u32>,
    cursor: Option<String>,
}

impl LogStreamsAdapter {
    /// List the streams of `group`
    pub fn new(client: ApiClient, group: impl Into<String>) -> Self {
        Self {
            client,
            group: group.into(),
            page_size: None,
            cursor: None,
        }
    }
}

#[async_trait]
impl PageAdapter for LogStreamsAdapter {
    type Item = LogStream;

    async fn fetch_page(&mut self) -> Result<Page<LogStream>> {
        let input = DescribeLogStreamsInput {
            log_group_name: &self.group,
            limit: self.page_size,
            next_token: self.cursor.as_deref(),
        };

        let output: DescribeLogStreamsOutput =
            self.client.call(DESCRIBE_LOG_STREAMS, &input).await?;
        Ok(Page::new(output.log_streams, output.next_token))
    }

    fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    fn set_page_size(&mut self, size: u32) {
        self.page_size = Some(size);
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}

// ============================================================================
// Log Events
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterLogEventsInput<'a> {
    log_group_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_pattern: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterLogEventsOutput {
    #[serde(default)]
    events: Vec<FilteredEvent>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilteredEvent {
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    message: String,
}

/// Fetches the events of one log group matching a [`QuerySpec`]
#[derive(Debug)]
pub struct LogEventsAdapter {
    client: ApiClient,
    spec: QuerySpec,
    page_size: Option<u32>,
    cursor: Option<String>,
}

impl LogEventsAdapter {
    /// Query the group named by `spec.source_id`
    pub fn new(client: ApiClient, spec: &QuerySpec) -> Self {
        Self {
            client,
            spec: spec.clone(),
            page_size: None,
            cursor: None,
        }
    }
}

#[async_trait]
impl PageAdapter for LogEventsAdapter {
    type Item = Record;

    async fn fetch_page(&mut self) -> Result<Page<Record>> {
        let input = FilterLogEventsInput {
            log_group_name: &self.spec.source_id,
            start_time: self.spec.window.start,
            end_time: self.spec.window.end,
            filter_pattern: self.spec.filter_pattern.as_deref(),
            limit: self.page_size,
            next_token: self.cursor.as_deref(),
        };

        let output: FilterLogEventsOutput = self.client.call(FILTER_LOG_EVENTS, &input).await?;
        debug!(
            group = %self.spec.source_id,
            events = output.events.len(),
            "Fetched log events"
        );

        let records = output
            .events
            .into_iter()
            .map(|e| Record::new(&self.spec.source_id, e.timestamp, e.message))
            .collect();
        Ok(Page::new(records, output.next_token))
    }

    fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    fn set_page_size(&mut self, size: u32) {
        self.page_size = Some(size);
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor;
    }
}
