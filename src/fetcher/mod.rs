//! Page fetcher module
//!
//! The page fetcher issues exactly one bounded request per call against the
//! record-query endpoints and returns a [`Page`].
//!
//! # Overview
//!
//! [`PageFetcher`] is the seam between the pagination strategies and the
//! network. [`RestFetcher`] implements it over HTTP; tests substitute an
//! in-memory collection.

mod rest;
mod types;

pub use rest::{RestFetcher, CURSOR_PATH, RECORDS_PATH};
pub use types::{CursorRequest, OpenedCursor, Page, PageFetcher, RecordsRequest};
