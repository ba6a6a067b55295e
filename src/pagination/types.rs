//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::{Error, Result};
use crate::fetcher::{CursorRequest, OpenedCursor, Page, RecordsRequest};
use crate::query::Query;
use crate::types::{Record, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which pagination strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Filter on ids greater than the last one seen
    IdThreshold,
    /// Server-side cursor
    Cursor,
    /// Numeric offset and limit
    Offset,
}

impl StrategyKind {
    /// All strategies
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::IdThreshold,
        StrategyKind::Cursor,
        StrategyKind::Offset,
    ];

    /// Short name
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::IdThreshold => "id",
            StrategyKind::Cursor => "cursor",
            StrategyKind::Offset => "offset",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "id" | "id_threshold" | "record_id" => Ok(StrategyKind::IdThreshold),
            "cursor" => Ok(StrategyKind::Cursor),
            "offset" => Ok(StrategyKind::Offset),
            other => Err(Error::validation(format!("unknown strategy '{other}'"))),
        }
    }
}

/// An open server-side cursor with a local idle deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorHandle {
    /// Opaque cursor id
    pub id: String,
    /// Records the cursor will yield, when reported
    pub total_count: Option<u64>,
    idle_lifetime: chrono::Duration,
    expires_at: DateTime<Utc>,
}

impl CursorHandle {
    /// Wrap a freshly opened cursor
    pub fn new(opened: OpenedCursor, idle_lifetime: chrono::Duration) -> Self {
        Self {
            id: opened.id,
            total_count: opened.total_count,
            idle_lifetime,
            expires_at: deadline(idle_lifetime),
        }
    }

    /// Restart the idle window after a successful advance
    pub fn touch(&mut self) {
        self.expires_at = deadline(self.idle_lifetime);
    }

    /// Check if the idle window has elapsed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// When the idle window ends
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Now plus `lifetime`, saturating at the latest representable instant
fn deadline(lifetime: chrono::Duration) -> DateTime<Utc> {
    Utc::now()
        .checked_add_signed(lifetime)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Strategy-specific continuation data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Largest id delivered so far
    IdThreshold {
        /// Next page starts after this id
        last_seen: RecordId,
    },
    /// Cursor, once opened
    Cursor {
        /// Handle; `None` until the open request succeeds
        handle: Option<CursorHandle>,
    },
    /// Offset window
    Offset {
        /// Records to skip on the next request
        offset: u64,
        /// Records still wanted; `None` for unbounded
        remaining: Option<u64>,
    },
}

/// Tracks one fetch from start to finish
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState {
    /// Records gathered so far, in delivery order
    pub records: Vec<Record>,
    /// Where the next page starts
    pub continuation: Continuation,
    /// Record pages received
    pub pages: u32,
    /// Is the fetch complete?
    pub done: bool,
}

impl FetchState {
    /// Create an empty state
    pub fn new(continuation: Continuation) -> Self {
        Self {
            records: Vec::new(),
            continuation,
            pages: 0,
            done: false,
        }
    }

    /// Mark the fetch as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Append one page of records
    pub fn push_page(&mut self, records: Vec<Record>) {
        self.pages += 1;
        self.records.extend(records);
    }

    /// Open cursor handle, if any
    pub fn cursor_handle(&self) -> Option<&CursorHandle> {
        match &self.continuation {
            Continuation::Cursor { handle } => handle.as_ref(),
            _ => None,
        }
    }
}

/// One request a strategy wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Bounded record query
    Records(RecordsRequest),
    /// Open a cursor
    OpenCursor(CursorRequest),
    /// Advance an open cursor
    CursorPage {
        /// Cursor id
        cursor_id: String,
    },
}

/// What came back for a [`PageRequest`]
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse {
    /// A page of records
    Page(Page),
    /// A newly opened cursor
    CursorOpened(OpenedCursor),
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Check the query and create the starting state
    fn initial_state(&self, query: &Query) -> Result<FetchState>;

    /// Build the next request from the current state
    fn next_request(&self, app: &str, query: &Query, state: &FetchState) -> Result<PageRequest>;

    /// Fold a response into the state, marking it done when complete
    fn process_response(&self, response: PageResponse, state: &mut FetchState) -> Result<()>;
}
