//! Common types used throughout bulk-records
//!
//! This module contains the record model and the small value types shared
//! by the query, fetcher, and pagination modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Constants
// ============================================================================

/// Largest page a single request may return
pub const MAX_PAGE_SIZE: u32 = 500;

/// Largest offset the record-query endpoint accepts
pub const MAX_OFFSET: u64 = 10_000;

/// Field code of the record primary key
pub const ID_FIELD: &str = "$id";

// ============================================================================
// Record
// ============================================================================

/// Record primary key
///
/// Ids are totally ordered and grow with insertion order inside one app.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The id below every real record
    pub const ZERO: RecordId = RecordId(0);

    /// Extract the id from a field value
    ///
    /// Accepts `{"type": "__ID__", "value": "12"}`, `"12"`, or `12`.
    pub fn from_field(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(map) => map.get("value").and_then(Self::from_field),
            JsonValue::String(s) => s.trim().parse().ok().map(RecordId),
            JsonValue::Number(n) => n.as_u64().map(RecordId),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// A single record returned by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key
    pub id: RecordId,
    /// All fields as returned, keyed by field code
    pub fields: JsonObject,
}

impl Record {
    /// Build a record from a raw JSON object, reading the id from `id_field`
    pub fn from_json(value: JsonValue, id_field: &str) -> Result<Self> {
        let JsonValue::Object(fields) = value else {
            return Err(Error::decode("record is not a JSON object"));
        };
        let id = fields
            .get(id_field)
            .and_then(RecordId::from_field)
            .ok_or_else(|| Error::decode(format!("record has no usable '{id_field}' field")))?;
        Ok(Self { id, fields })
    }

    /// Get the `value` of a field, unwrapping the `{type, value}` envelope
    pub fn value(&self, field: &str) -> Option<&JsonValue> {
        let raw = self.fields.get(field)?;
        match raw {
            JsonValue::Object(map) if map.contains_key("value") => map.get("value"),
            other => Some(other),
        }
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// One `order by` term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Field code
    pub field: String,
    /// Direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Ascending sort on a field
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on a field
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

impl FromStr for SortKey {
    type Err = Error;

    /// Parse `"field"`, `"field asc"`, or `"field desc"`
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| Error::validation("empty sort key"))?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(Error::validation(format!(
                    "unknown sort direction '{other}' in '{s}'"
                )))
            }
        };
        if parts.next().is_some() {
            return Err(Error::validation(format!("malformed sort key '{s}'")));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}
