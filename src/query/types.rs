//! Query types

use super::render::validate_field_code;
use crate::error::{Error, Result};
use crate::types::SortKey;
use serde::{Deserialize, Serialize};

/// A record query against one app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Target app (falls back to the client's default app)
    #[serde(default)]
    pub app: Option<String>,
    /// Filter predicate in the platform query language
    #[serde(default)]
    pub filter: Option<String>,
    /// Sort keys, applied in order
    #[serde(default)]
    pub sort: Vec<SortKey>,
    /// Field codes to return (all fields when `None`)
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    /// Maximum number of records to return in total
    #[serde(default)]
    pub limit: Option<u64>,
    /// Number of matching records to skip
    #[serde(default)]
    pub offset: u64,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query for an app
    pub fn for_app(app: impl Into<String>) -> Self {
        Self::new().app(app)
    }

    /// Set the target app
    #[must_use]
    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into()).filter(|a: &String| !a.trim().is_empty());
        self
    }

    /// Set the filter predicate; a blank filter clears it
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.trim().is_empty() {
            None
        } else {
            Some(filter)
        };
        self
    }

    /// Append a sort key
    #[must_use]
    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    /// Set the projection; blank entries are dropped and an empty list
    /// means all fields
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .map(Into::into)
            .filter(|f| !f.trim().is_empty())
            .collect();
        self.fields = if fields.is_empty() { None } else { Some(fields) };
        self
    }

    /// Set the total record limit
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the starting offset
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Filter with surrounding whitespace removed, if any is left
    pub fn filter_str(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Resolve the target app against a default
    pub fn resolve_app<'a>(&'a self, default_app: Option<&'a str>) -> Result<&'a str> {
        self.app
            .as_deref()
            .or(default_app)
            .ok_or_else(|| Error::validation("no app given and no default app configured"))
    }

    /// Projection with `field` appended when it is missing
    pub fn fields_including(&self, field: &str) -> Option<Vec<String>> {
        self.fields.as_ref().map(|fields| {
            let mut fields = fields.clone();
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
            fields
        })
    }

    /// Check field codes in the sort keys and projection
    pub fn validate(&self) -> Result<()> {
        for key in &self.sort {
            validate_field_code(&key.field)?;
        }
        if let Some(fields) = &self.fields {
            for field in fields {
                validate_field_code(field)?;
            }
        }
        Ok(())
    }
}
