//! Execution engine module
//!
//! Drives a pagination strategy to completion.
//!
//! # Overview
//!
//! The engine module provides:
//! - `RecordFetcher` - Runs one aggregated fetch page by page
//! - `FetchSettings` - Builds paginators by strategy kind
//! - `FetchReport` / `FetchStats` - Results of a completed fetch
//!
//! Pages are requested strictly one after another. The first error aborts
//! the fetch and the records gathered so far are dropped.

mod types;

pub use types::{FetchReport, FetchSettings, FetchStats, StrategySelector};

use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use crate::pagination::{FetchState, PageRequest, PageResponse, Paginator, StrategyKind};
use crate::query::Query;
use crate::types::Record;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Aggregates every page of a query into one record set
#[derive(Clone)]
pub struct RecordFetcher {
    /// Page fetcher
    fetcher: Arc<dyn PageFetcher>,
    /// App used when the query names none
    default_app: Option<String>,
    /// Paginator settings
    settings: FetchSettings,
}

impl RecordFetcher {
    /// Create a record fetcher
    pub fn new(fetcher: impl PageFetcher + 'static) -> Self {
        Self::from_arc(Arc::new(fetcher))
    }

    /// Create a record fetcher from a shared page fetcher
    pub fn from_arc(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            default_app: None,
            settings: FetchSettings::default(),
        }
    }

    /// Set the default app
    #[must_use]
    pub fn with_default_app(mut self, app: Option<String>) -> Self {
        self.default_app = app;
        self
    }

    /// Set paginator settings
    #[must_use]
    pub fn with_settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Get paginator settings
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetch every matching record with the given paginator
    pub async fn fetch(&self, query: &Query, paginator: &dyn Paginator) -> Result<FetchReport> {
        let start = Instant::now();
        let strategy = paginator.kind();

        query.validate()?;
        let app = query.resolve_app(self.default_app.as_deref())?.to_string();
        let mut state = paginator.initial_state(query)?;
        let mut requests = 0u32;

        debug!(%strategy, %app, "starting fetch");

        while !state.done {
            let outcome = match paginator.next_request(&app, query, &state) {
                Ok(request) => {
                    requests += 1;
                    self.execute(request).await
                }
                Err(e) => Err(e),
            }
            .and_then(|response| paginator.process_response(response, &mut state));

            if let Err(err) = outcome {
                self.release_cursor(&state, &err).await;
                return Err(err);
            }

            debug!(
                %strategy,
                pages = state.pages,
                records = state.records.len(),
                "page fetched"
            );
        }

        let stats = FetchStats {
            strategy,
            pages: state.pages,
            requests,
            records: state.records.len(),
            elapsed: start.elapsed(),
        };
        info!(
            %strategy,
            %app,
            pages = stats.pages,
            requests = stats.requests,
            records = stats.records,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "fetch complete"
        );

        Ok(FetchReport {
            records: state.records,
            stats,
        })
    }

    /// Fetch every matching record, returning only the records
    pub async fn fetch_all(&self, query: &Query, paginator: &dyn Paginator) -> Result<Vec<Record>> {
        Ok(self.fetch(query, paginator).await?.records)
    }

    /// Fetch with the paginator the settings build for `kind`
    pub async fn fetch_with(&self, query: &Query, kind: StrategyKind) -> Result<FetchReport> {
        let paginator = self.settings.paginator(kind);
        self.fetch(query, paginator.as_ref()).await
    }

    /// Fetch with whatever strategy the selector picks
    pub async fn fetch_auto(
        &self,
        query: &Query,
        selector: &dyn StrategySelector,
    ) -> Result<FetchReport> {
        let kind = selector.select(query);
        debug!(strategy = %kind, "strategy selected");
        self.fetch_with(query, kind).await
    }

    /// Send one request to the page fetcher
    async fn execute(&self, request: PageRequest) -> Result<PageResponse> {
        match request {
            PageRequest::Records(request) => self
                .fetcher
                .get_records(&request)
                .await
                .map(PageResponse::Page),
            PageRequest::OpenCursor(request) => self
                .fetcher
                .create_cursor(&request)
                .await
                .map(PageResponse::CursorOpened),
            PageRequest::CursorPage { cursor_id } => self
                .fetcher
                .get_cursor_page(&cursor_id)
                .await
                .map(PageResponse::Page),
        }
    }

    /// Free a cursor left open by a failed fetch
    async fn release_cursor(&self, state: &FetchState, err: &Error) {
        if err.is_cursor_expired() {
            return;
        }
        let Some(handle) = state.cursor_handle() else {
            return;
        };
        if let Err(delete_err) = self.fetcher.delete_cursor(&handle.id).await {
            warn!(cursor = %handle.id, error = %delete_err, "failed to delete cursor");
        }
    }
}

impl std::fmt::Debug for RecordFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFetcher")
            .field("default_app", &self.default_app)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
