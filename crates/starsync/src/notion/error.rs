use thiserror::Error;

use crate::sync::RemoteError;

/// Failure talking to the Notion REST API.
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Notion returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

impl From<NotionError> for RemoteError {
    fn from(e: NotionError) -> Self {
        match e {
            NotionError::Api(e) => RemoteError::Transport(e.to_string()),
            NotionError::Http { status, message } => RemoteError::Http { status, message },
        }
    }
}
