//! Pagination module
//!
//! Supports: ID threshold, server-side cursor, offset/limit
//!
//! # Overview
//!
//! Each strategy turns the caller's [`crate::query::Query`] plus its own
//! continuation state into the next single-page request, then folds the
//! response back into a [`FetchState`] and decides whether another page is
//! needed. The engine drives a strategy strictly sequentially.

mod strategies;
mod types;

pub use strategies::{CursorPaginator, IdThresholdPaginator, OffsetPaginator};
pub use types::{
    Continuation, CursorHandle, FetchState, PageRequest, PageResponse, Paginator, StrategyKind,
};

#[cfg(test)]
mod tests;
