//! Wire shapes for the GitHub GraphQL starred-repositories queries.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GraphQL response envelope: `data` and/or `errors`.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub starred_repositories: StarredConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarredConnection {
    pub page_info: RawPageInfo,
    #[serde(default)]
    pub edges: Vec<StarEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One starred repository plus the moment it was starred.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarEdge {
    pub starred_at: DateTime<Utc>,
    pub node: StarNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarNode {
    pub name_with_owner: String,
    pub url: String,
    pub description: Option<String>,
    pub primary_language: Option<Language>,
    pub repository_topics: Option<TopicConnection>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub stargazer_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct Language {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicConnection {
    pub nodes: Option<Vec<TopicNode>>,
}

#[derive(Debug, Deserialize)]
pub struct TopicNode {
    pub topic: Topic,
}

#[derive(Debug, Deserialize)]
pub struct Topic {
    pub name: String,
}
