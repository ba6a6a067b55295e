//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{
    Continuation, CursorHandle, FetchState, PageRequest, PageResponse, Paginator, StrategyKind,
};
use crate::error::{Error, Result};
use crate::fetcher::{CursorRequest, RecordsRequest};
use crate::query::{Query, QueryString};
use crate::types::{RecordId, SortDirection, SortKey, ID_FIELD, MAX_OFFSET, MAX_PAGE_SIZE};

fn check_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(Error::validation(format!(
            "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    Ok(())
}

fn reject_window(kind: StrategyKind, query: &Query) -> Result<()> {
    if query.limit.is_some() || query.offset > 0 {
        return Err(Error::validation(format!(
            "limit/offset are only supported by offset pagination, not {kind}"
        )));
    }
    Ok(())
}

fn unexpected(kind: StrategyKind, response: &PageResponse) -> Error {
    Error::decode(format!("{kind} pagination got unexpected response: {response:?}"))
}

// ============================================================================
// ID Threshold Pagination
// ============================================================================

/// Pagination by filtering on ids above the last one seen
///
/// Every request is `(<filter>) and $id > <last> order by $id asc limit <n>`.
/// A full page means there may be more; anything shorter ends the fetch.
/// Records inserted or deleted below the threshold during the fetch are not
/// reflected.
#[derive(Debug, Clone)]
pub struct IdThresholdPaginator {
    /// Records per request
    pub page_size: u32,
    /// Only records with an id above this are returned
    pub start_after: RecordId,
    /// Field code of the primary key
    pub id_field: String,
}

impl Default for IdThresholdPaginator {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            start_after: RecordId::ZERO,
            id_field: ID_FIELD.to_string(),
        }
    }
}

impl IdThresholdPaginator {
    /// Create a paginator with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Start after a given id
    #[must_use]
    pub fn start_after(mut self, id: RecordId) -> Self {
        self.start_after = id;
        self
    }

    /// Use a different primary key field
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }
}

impl Paginator for IdThresholdPaginator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::IdThreshold
    }

    fn initial_state(&self, query: &Query) -> Result<FetchState> {
        check_page_size(self.page_size)?;
        reject_window(self.kind(), query)?;

        let ascending_id = query.sort.iter().all(|key| {
            key.field == self.id_field && key.direction == SortDirection::Asc
        });
        if !ascending_id {
            return Err(Error::validation(format!(
                "id threshold pagination requires ascending '{}' order",
                self.id_field
            )));
        }

        Ok(FetchState::new(Continuation::IdThreshold {
            last_seen: self.start_after,
        }))
    }

    fn next_request(&self, app: &str, query: &Query, state: &FetchState) -> Result<PageRequest> {
        let Continuation::IdThreshold { last_seen } = &state.continuation else {
            return Err(Error::validation("fetch state does not belong to id pagination"));
        };

        let query_string = QueryString::new()
            .filter(query.filter_str())
            .condition(format!("{} > {}", self.id_field, last_seen))
            .order_by(&[SortKey::asc(&self.id_field)])
            .limit(self.page_size)
            .render();

        Ok(PageRequest::Records(RecordsRequest {
            app: app.to_string(),
            query: query_string,
            fields: query.fields_including(&self.id_field),
        }))
    }

    fn process_response(&self, response: PageResponse, state: &mut FetchState) -> Result<()> {
        let page = match response {
            PageResponse::Page(page) => page,
            other => return Err(unexpected(self.kind(), &other)),
        };
        let Continuation::IdThreshold { last_seen } = &mut state.continuation else {
            return Err(Error::validation("fetch state does not belong to id pagination"));
        };

        let full = page.len() == self.page_size as usize;
        if let Some(last) = page.records.last() {
            // A non-increasing id would make the next request repeat this page.
            if last.id <= *last_seen {
                return Err(Error::decode(format!(
                    "id {} is not above the threshold {}",
                    last.id, last_seen
                )));
            }
            *last_seen = last.id;
        }

        state.push_page(page.records);
        if !full {
            state.mark_done();
        }
        Ok(())
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Pagination through a server-side cursor
///
/// The first request opens the cursor; later requests advance it until the
/// server reports no further page. A handle left idle longer than
/// `idle_lifetime` is treated as expired without contacting the server.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Records per page
    pub page_size: u32,
    /// How long an unused cursor stays valid
    pub idle_lifetime: chrono::Duration,
    /// Field code of the primary key, always requested
    pub id_field: String,
}

impl Default for CursorPaginator {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            idle_lifetime: chrono::Duration::minutes(10),
            id_field: ID_FIELD.to_string(),
        }
    }
}

impl CursorPaginator {
    /// Create a paginator with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Set the idle lifetime
    #[must_use]
    pub fn with_idle_lifetime(mut self, lifetime: chrono::Duration) -> Self {
        self.idle_lifetime = lifetime;
        self
    }

    /// Use a different primary key field
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }
}

impl Paginator for CursorPaginator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Cursor
    }

    fn initial_state(&self, query: &Query) -> Result<FetchState> {
        check_page_size(self.page_size)?;
        reject_window(self.kind(), query)?;
        Ok(FetchState::new(Continuation::Cursor { handle: None }))
    }

    fn next_request(&self, app: &str, query: &Query, state: &FetchState) -> Result<PageRequest> {
        let Continuation::Cursor { handle } = &state.continuation else {
            return Err(Error::validation("fetch state does not belong to cursor pagination"));
        };

        match handle {
            None => {
                let query_string = QueryString::new()
                    .filter(query.filter_str())
                    .order_by(&query.sort)
                    .render();
                Ok(PageRequest::OpenCursor(CursorRequest {
                    app: app.to_string(),
                    query: query_string,
                    fields: query.fields_including(&self.id_field),
                    size: self.page_size,
                }))
            }
            Some(handle) if handle.is_expired() => Err(Error::cursor_expired(&handle.id)),
            Some(handle) => Ok(PageRequest::CursorPage {
                cursor_id: handle.id.clone(),
            }),
        }
    }

    fn process_response(&self, response: PageResponse, state: &mut FetchState) -> Result<()> {
        let Continuation::Cursor { handle } = &mut state.continuation else {
            return Err(Error::validation("fetch state does not belong to cursor pagination"));
        };

        match response {
            PageResponse::CursorOpened(opened) if handle.is_none() => {
                *handle = Some(CursorHandle::new(opened, self.idle_lifetime));
                Ok(())
            }
            PageResponse::Page(page) => {
                let Some(open) = handle.as_mut() else {
                    return Err(Error::decode("cursor page received before the cursor was opened"));
                };
                let has_next = page.has_next();
                if has_next {
                    open.touch();
                }
                state.push_page(page.records);
                if !has_next {
                    state.mark_done();
                }
                Ok(())
            }
            other => Err(unexpected(self.kind(), &other)),
        }
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset/limit pagination
///
/// Starts at `Query::offset` and stops after `Query::limit` records or at
/// the first short page. Inserts and deletes ahead of the current offset
/// shift the window, so records can be skipped or repeated on a changing
/// collection.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Largest page requested
    pub page_size: u32,
    /// Largest offset the server accepts
    pub max_offset: u64,
    /// Field code of the primary key, always requested
    pub id_field: String,
}

impl Default for OffsetPaginator {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_offset: MAX_OFFSET,
            id_field: ID_FIELD.to_string(),
        }
    }
}

impl OffsetPaginator {
    /// Create a paginator with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Set the largest accepted offset
    #[must_use]
    pub fn with_max_offset(mut self, max_offset: u64) -> Self {
        self.max_offset = max_offset;
        self
    }

    /// Use a different primary key field
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Size of the next page for the records still wanted
    fn page_len(&self, remaining: Option<u64>) -> u32 {
        match remaining {
            Some(remaining) => remaining.min(u64::from(self.page_size)) as u32,
            None => self.page_size,
        }
    }
}

impl Paginator for OffsetPaginator {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Offset
    }

    fn initial_state(&self, query: &Query) -> Result<FetchState> {
        check_page_size(self.page_size)?;
        if query.offset > self.max_offset {
            return Err(Error::validation(format!(
                "offset {} exceeds the maximum of {}",
                query.offset, self.max_offset
            )));
        }

        let mut state = FetchState::new(Continuation::Offset {
            offset: query.offset,
            remaining: query.limit,
        });
        if query.limit == Some(0) {
            state.mark_done();
        }
        Ok(state)
    }

    fn next_request(&self, app: &str, query: &Query, state: &FetchState) -> Result<PageRequest> {
        let Continuation::Offset { offset, remaining } = &state.continuation else {
            return Err(Error::validation("fetch state does not belong to offset pagination"));
        };

        if *offset > self.max_offset {
            return Err(Error::validation(format!(
                "offset {} exceeds the maximum of {}; use id or cursor pagination for large sets",
                offset, self.max_offset
            )));
        }

        let query_string = QueryString::new()
            .filter(query.filter_str())
            .order_by(&query.sort)
            .limit(self.page_len(*remaining))
            .offset(*offset)
            .render();

        Ok(PageRequest::Records(RecordsRequest {
            app: app.to_string(),
            query: query_string,
            fields: query.fields_including(&self.id_field),
        }))
    }

    fn process_response(&self, response: PageResponse, state: &mut FetchState) -> Result<()> {
        let mut page = match response {
            PageResponse::Page(page) => page,
            other => return Err(unexpected(self.kind(), &other)),
        };
        let Continuation::Offset { offset, remaining } = &mut state.continuation else {
            return Err(Error::validation("fetch state does not belong to offset pagination"));
        };

        let requested = self.page_len(*remaining) as usize;
        page.records.truncate(requested);
        let returned = page.records.len();

        *offset += returned as u64;
        if let Some(remaining) = remaining.as_mut() {
            *remaining = remaining.saturating_sub(returned as u64);
        }
        let exhausted = returned < requested || *remaining == Some(0);

        state.push_page(page.records);
        if exhausted {
            state.mark_done();
        }
        Ok(())
    }
}
