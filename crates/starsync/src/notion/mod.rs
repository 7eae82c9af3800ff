//! Notion REST client for the destination database.

mod client;
mod convert;
mod error;
mod types;

pub use client::NotionClient;
pub use convert::MAX_RICH_TEXT_LEN;
pub use error::NotionError;
