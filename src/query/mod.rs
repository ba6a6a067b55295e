//! Query module
//!
//! Typed description of a record query and rendering into the platform
//! query language (`<conditions> order by ... limit ... offset ...`).
//!
//! # Overview
//!
//! A [`Query`] carries what the caller wants: the target app, a filter,
//! sort keys, an optional projection, and offset/limit bounds. Pagination
//! strategies add their own continuation condition and page bound through
//! [`QueryString`] before each request.

mod render;
mod types;

pub use render::{validate_field_code, QueryString};
pub use types::Query;
