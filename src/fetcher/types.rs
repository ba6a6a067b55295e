//! Page fetcher types and trait

use crate::error::Result;
use crate::types::Record;
use async_trait::async_trait;

/// One page of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records in delivery order
    pub records: Vec<Record>,
    /// Token to fetch the following page, if the server says there is one
    pub continuation: Option<String>,
}

impl Page {
    /// Create a page with no continuation
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            continuation: None,
        }
    }

    /// Number of records in the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the page is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if the server signalled another page
    pub fn has_next(&self) -> bool {
        self.continuation.is_some()
    }
}

/// A single bounded record query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsRequest {
    /// Target app
    pub app: String,
    /// Full query string, including `limit`
    pub query: String,
    /// Projection
    pub fields: Option<Vec<String>>,
}

/// Parameters for opening a server-side cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorRequest {
    /// Target app
    pub app: String,
    /// Query string without `limit`/`offset`
    pub query: String,
    /// Projection
    pub fields: Option<Vec<String>>,
    /// Records per page
    pub size: u32,
}

/// A cursor as reported by the server on creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedCursor {
    /// Opaque cursor id
    pub id: String,
    /// Number of records the cursor will yield, when reported
    pub total_count: Option<u64>,
}

/// Issues single requests against the record-query endpoints
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page with a bounded query
    async fn get_records(&self, request: &RecordsRequest) -> Result<Page>;

    /// Open a server-side cursor
    async fn create_cursor(&self, request: &CursorRequest) -> Result<OpenedCursor>;

    /// Fetch the next page from a cursor
    ///
    /// The page's continuation is set while the cursor has more pages.
    async fn get_cursor_page(&self, cursor_id: &str) -> Result<Page>;

    /// Release a cursor before it is exhausted
    async fn delete_cursor(&self, cursor_id: &str) -> Result<()>;
}
