// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # bulk-records
//!
//! Fetch every record matching a query from a low-code platform's REST API,
//! past the per-request page cap.
//!
//! ## Strategies
//!
//! - **Id threshold**: `$id > last order by $id asc limit n`, repeated until a
//!   short page. Cheapest; requires ascending id order.
//! - **Cursor**: a server-side cursor opened once and advanced until the
//!   server reports no further page. Any sort order.
//! - **Offset**: `limit`/`offset` windows. Honors caller limit and offset,
//!   but only up to the server's maximum offset.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bulk_records::{ClientConfig, Query, StrategyKind};
//!
//! #[tokio::main]
//! async fn main() -> bulk_records::Result<()> {
//!     let fetcher = ClientConfig::with_api_token("https://example.cybozu.com", "token")
//!         .build_fetcher()?;
//!
//!     let query = Query::for_app("42").filter("status = \"open\"");
//!     let report = fetcher.fetch_with(&query, StrategyKind::IdThreshold).await?;
//!     println!("{} records in {} requests", report.records.len(), report.stats.requests);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                RecordFetcher (aggregator)                │
//! │   fetch(query, paginator) → FetchReport { records, .. }  │
//! └──────────────────────────────────────────────────────────┘
//!                 │                          │
//! ┌───────────────┴─────────┐   ┌────────────┴───────────────┐
//! │       Paginator         │   │        PageFetcher         │
//! ├─────────────────────────┤   ├────────────────────────────┤
//! │ IdThreshold             │   │ RestFetcher                │
//! │ Cursor                  │   │   records.json             │
//! │ Offset                  │   │   records/cursor.json      │
//! └─────────────────────────┘   └────────────────────────────┘
//!                                             │
//!                               ┌─────────────┴──────────────┐
//!                               │ HttpClient: auth, rate     │
//!                               │ limit, status mapping      │
//!                               └────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Query model and query-string rendering
pub mod query;

/// Authentication headers
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Page fetchers for the records API
pub mod fetcher;

/// Pagination strategies
pub mod pagination;

/// Aggregator driving a paginator to completion
pub mod engine;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ClientConfig;
pub use engine::{FetchReport, FetchSettings, FetchStats, RecordFetcher, StrategySelector};
pub use fetcher::{Page, PageFetcher, RestFetcher};
pub use pagination::{CursorPaginator, IdThresholdPaginator, OffsetPaginator, Paginator, StrategyKind};
pub use query::Query;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
