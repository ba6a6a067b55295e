//! Engine types
//!
//! Settings, statistics, and strategy selection for the record fetcher.

use crate::pagination::{
    CursorPaginator, IdThresholdPaginator, OffsetPaginator, Paginator, StrategyKind,
};
use crate::query::Query;
use crate::types::{Record, RecordId, ID_FIELD, MAX_OFFSET, MAX_PAGE_SIZE};
use std::time::Duration;

/// Settings used to build paginators by kind
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Records per request
    pub page_size: u32,
    /// Primary key field code
    pub id_field: String,
    /// Id floor for id threshold pagination
    pub start_after: RecordId,
    /// Idle lifetime of a server-side cursor
    pub cursor_idle_lifetime: chrono::Duration,
    /// Largest offset the server accepts
    pub max_offset: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            id_field: ID_FIELD.to_string(),
            start_after: RecordId::ZERO,
            cursor_idle_lifetime: chrono::Duration::minutes(10),
            max_offset: MAX_OFFSET,
        }
    }
}

impl FetchSettings {
    /// Build the paginator for a strategy
    pub fn paginator(&self, kind: StrategyKind) -> Box<dyn Paginator> {
        match kind {
            StrategyKind::IdThreshold => Box::new(
                IdThresholdPaginator::new(self.page_size)
                    .start_after(self.start_after)
                    .with_id_field(&self.id_field),
            ),
            StrategyKind::Cursor => Box::new(
                CursorPaginator::new(self.page_size)
                    .with_idle_lifetime(self.cursor_idle_lifetime)
                    .with_id_field(&self.id_field),
            ),
            StrategyKind::Offset => Box::new(
                OffsetPaginator::new(self.page_size)
                    .with_max_offset(self.max_offset)
                    .with_id_field(&self.id_field),
            ),
        }
    }
}

/// Statistics for one completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchStats {
    /// Strategy used
    pub strategy: StrategyKind,
    /// Record pages received
    pub pages: u32,
    /// Requests issued, including cursor creation
    pub requests: u32,
    /// Records returned
    pub records: usize,
    /// Wall-clock time
    pub elapsed: Duration,
}

/// Result of a completed fetch
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// All records in delivery order
    pub records: Vec<Record>,
    /// Statistics
    pub stats: FetchStats,
}

/// Chooses a strategy for a query
///
/// The crate ships no heuristic of its own; callers that want automatic
/// selection supply one.
pub trait StrategySelector: Send + Sync {
    /// Pick the strategy for this query
    fn select(&self, query: &Query) -> StrategyKind;
}

impl<F> StrategySelector for F
where
    F: Fn(&Query) -> StrategyKind + Send + Sync,
{
    fn select(&self, query: &Query) -> StrategyKind {
        self(query)
    }
}
