//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;

// ============================================================================
// Test Adapters
// ============================================================================

/// Serves `total` numbered items, honouring the requested page size and
/// using the offset as cursor.
#[derive(Debug, Default)]
struct CountingAdapter {
    total: usize,
    page_size: Option<u32>,
    cursor: Option<String>,
    calls: usize,
    requested_sizes: Vec<u32>,
}

impl CountingAdapter {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PageAdapter for CountingAdapter {
    type Item = usize;

    async fn fetch_page(&mut self) -> Result<Page<usize>> {
        self.calls += 1;
        let size = self.page_size.unwrap_or(u32::MAX) as usize;
        self.requested_sizes.push(size as u32);

        let start: usize = self
            .cursor
            .as_deref()
            .map(|c| c.parse().unwrap())
            .unwrap_or(0);
        let end = (start + size).min(self.total);
        let items: Vec<usize> = (start..end).collect();

        let next = (end < self.total).then(|| end.to_string());
        Ok(Page::new(items, next))
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

/// Replays a fixed script of pages, ignoring the requested size
#[derive(Debug, Default)]
struct ScriptedAdapter {
    pages: Vec<Result<Page<String>>>,
    page_size: Option<u32>,
    cursors_seen: Vec<Option<String>>,
    requested_sizes: Vec<Option<u32>>,
}

impl ScriptedAdapter {
    fn new(pages: Vec<Result<Page<String>>>) -> Self {
        Self {
            pages: pages.into_iter().rev().collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PageAdapter for ScriptedAdapter {
    type Item = String;

    async fn fetch_page(&mut self) -> Result<Page<String>> {
        self.requested_sizes.push(self.page_size);
        self.pages.pop().expect("adapter called more often than scripted")
    }

    fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    fn set_page_size(&mut self, size: u32) {
        self.page_size = Some(size);
    }

    fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursors_seen.push(cursor);
    }
}

fn strings(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state = PaginationState::new();
    assert!(state.limit.is_none());
    assert_eq!(state.fetched, 0);
    assert!(state.cursor.is_none());
    assert!(!state.started);
    assert!(state.has_next_page());
}

#[test]
fn test_pagination_state_limit_reached() {
    let mut state = PaginationState::with_limit(Some(5));
    assert_eq!(state.remaining(), Some(5));

    state.advance(3, Some("next".to_string()));
    assert!(state.has_next_page());
    assert_eq!(state.remaining(), Some(2));

    state.advance(2, Some("next".to_string()));
    assert!(state.limit_reached());
    assert!(!state.has_next_page());
}

#[test]
fn test_pagination_state_empty_cursor_is_terminal() {
    let mut state = PaginationState::new();
    state.advance(4, Some(String::new()));
    assert!(state.cursor.is_none());
    assert!(!state.has_next_page());
}

// ============================================================================
// PageFetcher Tests
// ============================================================================

#[tokio::test]
async fn test_new_applies_default_page_size() {
    let fetcher = PageFetcher::new(CountingAdapter::new(0), 25);
    assert_eq!(fetcher.adapter().page_size(), Some(25));

    let mut adapter = CountingAdapter::new(0);
    adapter.set_page_size(7);
    let fetcher = PageFetcher::new(adapter, 25);
    assert_eq!(fetcher.adapter().page_size(), Some(7));
}

#[tokio::test]
async fn test_fetch_limit() {
    // Adapter always has more; the limit alone ends pagination
    let mut fetcher =
        PageFetcher::new(CountingAdapter::new(usize::MAX), 10).with_limit(Some(125));
    assert!(fetcher.has_next_page());

    let items = fetcher.all().await.unwrap();
    assert_eq!(items.len(), 125);
    assert!(!fetcher.has_next_page());
}

#[tokio::test]
async fn test_pagination_pages_shrink_to_limit() {
    let mut fetcher =
        PageFetcher::new(CountingAdapter::new(usize::MAX), 10).with_limit(Some(15));
    assert!(fetcher.has_next_page());

    let first = fetcher.next_page().await.unwrap();
    assert_eq!(first.len(), 10);

    let second = fetcher.next_page().await.unwrap();
    assert_eq!(second.len(), 5);

    assert!(!fetcher.has_next_page());
}

#[tokio::test]
async fn test_all_returns_min_of_limit_and_available() {
    let cases: [(u32, Option<u32>, usize); 5] = [
        (10, Some(0), 30),
        (10, Some(7), 30),
        (10, Some(50), 30),
        (3, None, 11),
        (4, Some(8), 8),
    ];

    for (page_size, limit, total) in cases {
        let mut fetcher =
            PageFetcher::new(CountingAdapter::new(total), page_size).with_limit(limit);
        let items = fetcher.all().await.unwrap();

        let expected = limit.map_or(total, |l| (l as usize).min(total));
        assert_eq!(
            items.len(),
            expected,
            "page_size={page_size} limit={limit:?} total={total}"
        );
        assert_eq!(items, (0..expected).collect::<Vec<_>>());
        assert!(!fetcher.has_next_page());
    }
}

#[tokio::test]
async fn test_next_page_concatenation_equals_all() {
    let mut stepwise = PageFetcher::new(CountingAdapter::new(23), 5).with_limit(Some(17));
    let mut concatenated = Vec::new();
    while stepwise.has_next_page() {
        concatenated.extend(stepwise.next_page().await.unwrap());
    }

    let mut whole = PageFetcher::new(CountingAdapter::new(23), 5).with_limit(Some(17));
    let all = whole.all().await.unwrap();

    assert_eq!(concatenated, all);
}

#[tokio::test]
async fn test_next_page_on_exhausted_fetcher_does_not_call_adapter() {
    let mut fetcher = PageFetcher::new(CountingAdapter::new(3), 10);
    fetcher.all().await.unwrap();
    assert_eq!(fetcher.adapter().calls, 1);

    let err = fetcher.next_page().await.unwrap_err();
    assert!(matches!(err, Error::NoNextPage));
    assert_eq!(fetcher.adapter().calls, 1);
}

#[tokio::test]
async fn test_zero_limit_yields_single_empty_page() {
    let mut fetcher = PageFetcher::new(CountingAdapter::new(100), 10).with_limit(Some(0));
    assert!(fetcher.has_next_page());

    let page = fetcher.next_page().await.unwrap();
    assert!(page.is_empty());
    assert!(!fetcher.has_next_page());
    assert_eq!(fetcher.adapter().calls, 0);
}

#[tokio::test]
async fn test_final_page_requests_exact_remainder() {
    let adapter = ScriptedAdapter::new(vec![
        Ok(Page::new(strings("a", 10), Some("t1".to_string()))),
        Ok(Page::new(strings("b", 10), Some("t2".to_string()))),
        Ok(Page::new(strings("c", 5), Some("t3".to_string()))),
    ]);
    let mut fetcher = PageFetcher::new(adapter, 10).with_limit(Some(22));

    let items = fetcher.all().await.unwrap();
    assert_eq!(items.len(), 22);
    assert_eq!(items[20..], strings("c", 2)[..]);
    assert!(!fetcher.has_next_page());

    let adapter = fetcher.into_adapter();
    assert_eq!(adapter.requested_sizes, vec![Some(10), Some(10), Some(2)]);
    assert_eq!(
        adapter.cursors_seen,
        vec![None, Some("t1".to_string()), Some("t2".to_string())]
    );
}

#[tokio::test]
async fn test_oversized_page_is_truncated_to_limit() {
    let adapter = ScriptedAdapter::new(vec![Ok(Page::new(
        strings("x", 9),
        Some("more".to_string()),
    ))]);
    let mut fetcher = PageFetcher::new(adapter, 10).with_limit(Some(4));

    let items = fetcher.all().await.unwrap();
    assert_eq!(items, strings("x", 4));
    assert!(!fetcher.has_next_page());
}

#[tokio::test]
async fn test_empty_cursor_on_first_page_is_terminal() {
    let adapter = ScriptedAdapter::new(vec![Ok(Page::new(
        strings("x", 3),
        Some(String::new()),
    ))]);
    let mut fetcher = PageFetcher::new(adapter, 10);

    let items = fetcher.all().await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(!fetcher.has_next_page());
}

#[tokio::test]
async fn test_empty_first_page_without_cursor() {
    let adapter = ScriptedAdapter::new(vec![Ok(Page::last(Vec::new()))]);
    let mut fetcher = PageFetcher::new(adapter, 10);

    assert!(fetcher.all().await.unwrap().is_empty());
    assert!(fetcher.state().started);
    assert!(!fetcher.has_next_page());
}

#[tokio::test]
async fn test_all_discards_partial_results_on_error() {
    let adapter = ScriptedAdapter::new(vec![
        Ok(Page::new(strings("a", 10), Some("t1".to_string()))),
        Err(Error::adapter("group-a", "connection reset")),
    ]);
    let mut fetcher = PageFetcher::new(adapter, 10);

    let err = fetcher.all().await.unwrap_err();
    assert!(matches!(err, Error::Adapter { .. }));
    // The failed page does not advance the state
    assert_eq!(fetcher.state().fetched, 10);
    assert_eq!(fetcher.state().cursor.as_deref(), Some("t1"));
}
