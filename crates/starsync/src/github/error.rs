use thiserror::Error;

use crate::sync::RemoteError;

/// Failure talking to the GitHub GraphQL API.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("GitHub returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("GitHub GraphQL error: {0}")]
    Graphql(String),
}

impl From<GithubError> for RemoteError {
    fn from(e: GithubError) -> Self {
        match e {
            GithubError::Api(e) => RemoteError::Transport(e.to_string()),
            GithubError::Http { status, message } => RemoteError::Http { status, message },
            GithubError::Graphql(message) => RemoteError::Protocol(message),
        }
    }
}
