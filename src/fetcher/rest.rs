//! HTTP implementation of the page fetcher

use super::types::{CursorRequest, OpenedCursor, Page, PageFetcher, RecordsRequest};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{JsonValue, Record, ID_FIELD};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Record query endpoint
pub const RECORDS_PATH: &str = "/k/v1/records.json";

/// Cursor endpoint
pub const CURSOR_PATH: &str = "/k/v1/records/cursor.json";

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Vec<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct CursorCreatedResponse {
    id: String,
    #[serde(rename = "totalCount", default)]
    total_count: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct CursorPageResponse {
    records: Vec<JsonValue>,
    #[serde(default)]
    next: bool,
}

/// Page fetcher over the platform REST API
#[derive(Debug)]
pub struct RestFetcher {
    http: HttpClient,
    id_field: String,
}

impl RestFetcher {
    /// Create a fetcher using the default id field
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            id_field: ID_FIELD.to_string(),
        }
    }

    /// Read record ids from a different field
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    fn decode_records(&self, raw: Vec<JsonValue>) -> Result<Vec<Record>> {
        raw.into_iter()
            .map(|value| Record::from_json(value, &self.id_field))
            .collect()
    }
}

#[async_trait]
impl PageFetcher for RestFetcher {
    async fn get_records(&self, request: &RecordsRequest) -> Result<Page> {
        let mut config = RequestConfig::new()
            .query("app", &request.app)
            .query("query", &request.query);
        if let Some(fields) = &request.fields {
            for (i, field) in fields.iter().enumerate() {
                config = config.query(format!("fields[{i}]"), field);
            }
        }

        let response: RecordsResponse = self
            .http
            .request_json(Method::GET, RECORDS_PATH, config)
            .await
            .map_err(rejected_query)?;
        let records = self.decode_records(response.records)?;
        debug!(app = %request.app, count = records.len(), "fetched records page");
        Ok(Page::new(records))
    }

    async fn create_cursor(&self, request: &CursorRequest) -> Result<OpenedCursor> {
        let mut body = json!({
            "app": request.app,
            "query": request.query,
            "size": request.size,
        });
        if let Some(fields) = &request.fields {
            body["fields"] = json!(fields);
        }

        let response: CursorCreatedResponse = self
            .http
            .request_json(Method::POST, CURSOR_PATH, RequestConfig::new().json(body))
            .await
            .map_err(rejected_query)?;
        debug!(app = %request.app, cursor = %response.id, "opened cursor");
        Ok(OpenedCursor {
            id: response.id,
            total_count: response.total_count.as_ref().and_then(parse_count),
        })
    }

    async fn get_cursor_page(&self, cursor_id: &str) -> Result<Page> {
        let config = RequestConfig::new().query("id", cursor_id);
        let response: CursorPageResponse = self
            .http
            .request_json(Method::GET, CURSOR_PATH, config)
            .await
            .map_err(|e| match e {
                Error::HttpStatus {
                    status: 400 | 404, ..
                } => Error::cursor_expired(cursor_id),
                other => other,
            })?;

        let records = self.decode_records(response.records)?;
        debug!(cursor = %cursor_id, count = records.len(), next = response.next, "fetched cursor page");
        Ok(Page {
            records,
            continuation: response.next.then(|| cursor_id.to_string()),
        })
    }

    async fn delete_cursor(&self, cursor_id: &str) -> Result<()> {
        self.http
            .delete(CURSOR_PATH, json!({ "id": cursor_id }))
            .await?;
        debug!(cursor = %cursor_id, "deleted cursor");
        Ok(())
    }
}

/// A 400 on a query means the server could not parse or apply it
fn rejected_query(err: Error) -> Error {
    match err {
        Error::HttpStatus { status: 400, body } => {
            Error::validation(format!("query rejected by server: {body}"))
        }
        other => other,
    }
}

/// Counts arrive as decimal strings, occasionally as numbers
fn parse_count(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::String(s) => s.parse().ok(),
        JsonValue::Number(n) => n.as_u64(),
        _ => None,
    }
}
