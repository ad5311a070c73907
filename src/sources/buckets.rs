//! Bucket listing adapter
//!
//! The bucket service is REST-XML rather than JSON RPC: a `GET` on the
//! endpoint root with `max-buckets`, `continuation-token` and
//! `bucket-region` query parameters, answered by a
//! `<ListAllMyBucketsResult>` document.

use crate::error::{Error, Result};
use crate::http::{xml, ApiClient};
use crate::pagination::{Page, PageAdapter};
use crate::types::Bucket;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub(crate) const LIST_BUCKETS_RESULT: &str = "ListAllMyBucketsResult";

/// Page size used for bucket listings when none is configured
pub const DEFAULT_BUCKETS_PAGE_SIZE: u32 = 1000;

/// Lists buckets, optionally restricted to one region
#[derive(Debug)]
pub struct BucketsAdapter {
    client: ApiClient,
    region: Option<String>,
    page_size: Option<u32>,
    cursor: Option<String>,
}

impl BucketsAdapter {
    /// Create a bucket listing adapter
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            region: None,
            page_size: None,
            cursor: None,
        }
    }

    /// Only list buckets in `region`; empty values are ignored
    #[must_use]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|r| !r.is_empty());
        self
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(size) = self.page_size {
            query.push(("max-buckets", size.to_string()));
        }
        if let Some(token) = &self.cursor {
            query.push(("continuation-token", token.clone()));
        }
        if let Some(region) = &self.region {
            query.push(("bucket-region", region.clone()));
        }
        query
    }
}

#[async_trait]
impl PageAdapter for BucketsAdapter {
    type Item = Bucket;

    async fn fetch_page(&mut self) -> Result<Page<Bucket>> {
        let body = self.client.get_text(&self.query()).await?;
        parse_list_buckets(&body)
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

/// Decode one `<ListAllMyBucketsResult>` page
pub(crate) fn parse_list_buckets(body: &str) -> Result<Page<Bucket>> {
    let Some(result) = xml::elements(body, LIST_BUCKETS_RESULT).into_iter().next() else {
        return Err(Error::xml(format!("missing <{LIST_BUCKETS_RESULT}> element")));
    };

    let buckets = xml::elements(result, "Bucket")
        .into_iter()
        .map(|bucket| Bucket {
            name: xml::element_text(bucket, "Name").unwrap_or_default(),
            creation_date: xml::element_text(bucket, "CreationDate")
                .and_then(|date| DateTime::parse_from_rfc3339(&date).ok())
                .map(|date| date.with_timezone(&Utc)),
        })
        .collect();

    Ok(Page::new(
        buckets,
        xml::element_text(result, "ContinuationToken"),
    ))
}
