//! Rendering of platform query strings

use crate::error::{Error, Result};
use crate::types::SortKey;
use once_cell::sync::Lazy;
use regex::Regex;

static FIELD_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}_$・＿]+$").expect("field code pattern is valid"));

/// Reject field codes that could not be spliced into a query safely
pub fn validate_field_code(field: &str) -> Result<()> {
    if FIELD_CODE.is_match(field) {
        Ok(())
    } else {
        Err(Error::validation(format!("invalid field code '{field}'")))
    }
}

/// Builder for one request's query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    filter: Option<String>,
    conditions: Vec<String>,
    order_by: Vec<SortKey>,
    limit: Option<u32>,
    offset: Option<u64>,
}

impl QueryString {
    /// Create an empty query string
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the caller's filter predicate
    #[must_use]
    pub fn filter(mut self, filter: Option<&str>) -> Self {
        self.filter = filter.map(str::to_string);
        self
    }

    /// Add a condition, joined to the filter with `and`
    #[must_use]
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Set the sort keys
    #[must_use]
    pub fn order_by(mut self, keys: &[SortKey]) -> Self {
        self.order_by = keys.to_vec();
        self
    }

    /// Set the `limit` clause
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the `offset` clause
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render to the platform query language
    pub fn render(&self) -> String {
        let mut terms = Vec::with_capacity(self.conditions.len() + 1);
        if let Some(filter) = &self.filter {
            if self.conditions.is_empty() {
                terms.push(filter.clone());
            } else {
                terms.push(format!("({filter})"));
            }
        }
        terms.extend(self.conditions.iter().cloned());

        let mut out = terms.join(" and ");

        if !self.order_by.is_empty() {
            let keys: Vec<String> = self.order_by.iter().map(ToString::to_string).collect();
            out.push_str(" order by ");
            out.push_str(&keys.join(", "));
        }
        if let Some(limit) = self.limit {
            out.push_str(&format!(" limit {limit}"));
        }
        if let Some(offset) = self.offset {
            out.push_str(&format!(" offset {offset}"));
        }

        out.trim_start().to_string()
    }
}
