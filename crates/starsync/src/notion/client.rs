//! Authenticated REST client for api.notion.com.

use async_trait::async_trait;

use crate::record::{InventoryPage, RepositoryRecord};
use crate::sync::{RemoteError, TargetClient};

use super::convert::{page_properties, page_title};
use super::error::NotionError;
use super::types::{CreatedPage, DatabaseQuery, DatabaseQueryResponse};

const API_BASE: &str = "https://api.notion.com/v1";
const NOTION_API_VERSION: &str = "2022-06-28";

/// Page size for inventory scans; Notion's per-request maximum.
const QUERY_PAGE_SIZE: u32 = 100;

/// Notion API client scoped to one database.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            database_id: database_id.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{API_BASE}{path}"))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_API_VERSION)
    }

    async fn check<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, NotionError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotionError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch one page of the database's rows.
    async fn query_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<DatabaseQueryResponse, NotionError> {
        let body = DatabaseQuery {
            page_size: QUERY_PAGE_SIZE,
            start_cursor: cursor.map(String::from),
        };
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/databases/{}/query", self.database_id),
            )
            .json(&body)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Create one page in the database.
    async fn create_page(&self, record: &RepositoryRecord) -> Result<CreatedPage, NotionError> {
        let body = serde_json::json!({
            "parent": { "database_id": self.database_id },
            "properties": page_properties(record),
        });
        let response = self
            .request(reqwest::Method::POST, "/pages")
            .json(&body)
            .send()
            .await?;
        Self::check(response).await
    }
}

#[async_trait]
impl TargetClient for NotionClient {
    async fn query_existing(&self, cursor: Option<&str>) -> Result<InventoryPage, RemoteError> {
        let response = self.query_page(cursor).await.map_err(RemoteError::from)?;

        let mut entries = Vec::with_capacity(response.results.len());
        for page in response.results {
            match page_title(&page.properties) {
                Some(title) => entries.push((title, page.id)),
                // Hand-added rows without a title can't be keyed; ignore.
                None => tracing::warn!(page_id = %page.id, "skipping untitled page in inventory"),
            }
        }

        Ok(InventoryPage {
            entries,
            next_cursor: response.next_cursor,
            has_more: response.has_more,
        })
    }

    async fn create_record(&self, record: &RepositoryRecord) -> Result<String, RemoteError> {
        let created = self.create_page(record).await.map_err(RemoteError::from)?;
        Ok(created.id)
    }
}
