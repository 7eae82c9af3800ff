//! Authenticated GraphQL client for github.com.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::record::{PageInfo, RepositoryRecord, StarPage};
use crate::sync::{RemoteError, SourceClient};

use super::convert::to_record;
use super::error::GithubError;
use super::types::{GraphqlResponse, ViewerData};

const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const STARRED_PAGE_QUERY: &str = "\
query ($after: String, $first: Int!, $topicFirst: Int!) {
  viewer {
    starredRepositories(first: $first, after: $after) {
      pageInfo { endCursor hasNextPage }
      edges {
        starredAt
        node {
          nameWithOwner
          url
          description
          primaryLanguage { name }
          repositoryTopics(first: $topicFirst) { nodes { topic { name } } }
          updatedAt
          stargazerCount
        }
      }
    }
  }
}";

const STARRED_TAIL_QUERY: &str = "\
query ($last: Int!, $topicFirst: Int!) {
  viewer {
    starredRepositories(last: $last) {
      pageInfo { endCursor hasNextPage }
      edges {
        starredAt
        node {
          nameWithOwner
          url
          description
          primaryLanguage { name }
          repositoryTopics(first: $topicFirst) { nodes { topic { name } } }
          updatedAt
          stargazerCount
        }
      }
    }
  }
}";

/// GitHub GraphQL API client scoped to the token's viewer.
///
/// The starred list is read through the `viewer` field, so the token
/// decides whose stars are synced; no username is configured.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
        }
    }

    /// POST one GraphQL query and unwrap the response envelope.
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, GithubError> {
        let response = self
            .http
            .post(GRAPHQL_ENDPOINT)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, "starsync")
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GithubError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GraphqlResponse<T> = response.json().await?;
        if let Some(error) = envelope.errors.first() {
            return Err(GithubError::Graphql(error.message.clone()));
        }
        envelope
            .data
            .ok_or_else(|| GithubError::Graphql("response carried no data".to_string()))
    }

    async fn starred_connection(
        &self,
        query: &str,
        variables: serde_json::Value,
        topic_limit: u32,
    ) -> Result<StarPage, GithubError> {
        let data: ViewerData = self.graphql(query, variables).await?;
        let connection = data.viewer.starred_repositories;

        let page_info = PageInfo {
            end_cursor: connection.page_info.end_cursor,
            has_next_page: connection.page_info.has_next_page,
        };
        let records = connection
            .edges
            .into_iter()
            .map(|edge| to_record(edge, topic_limit))
            .collect();
        Ok(StarPage { records, page_info })
    }
}

#[async_trait]
impl SourceClient for GithubClient {
    async fn starred_page(
        &self,
        cursor: Option<&str>,
        page_size: u32,
        topic_limit: u32,
    ) -> Result<StarPage, RemoteError> {
        let variables = serde_json::json!({
            "after": cursor,
            "first": page_size,
            "topicFirst": topic_limit,
        });
        self.starred_connection(STARRED_PAGE_QUERY, variables, topic_limit)
            .await
            .map_err(RemoteError::from)
    }

    async fn starred_tail(
        &self,
        count: u32,
        topic_limit: u32,
    ) -> Result<Vec<RepositoryRecord>, RemoteError> {
        let variables = serde_json::json!({
            "last": count,
            "topicFirst": topic_limit,
        });
        let page = self
            .starred_connection(STARRED_TAIL_QUERY, variables, topic_limit)
            .await
            .map_err(RemoteError::from)?;
        Ok(page.records)
    }
}
