//! Wire shapes for the Notion database-query and page-create endpoints.

use serde::{Deserialize, Serialize};

/// Body for `POST /v1/databases/{id}/query`.
#[derive(Debug, Serialize)]
pub struct DatabaseQuery {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseQueryResponse {
    #[serde(default)]
    pub results: Vec<NotionPage>,
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// An existing page; properties stay untyped since only the title is read.
#[derive(Debug, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPage {
    pub id: String,
}
