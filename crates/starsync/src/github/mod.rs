//! GitHub GraphQL client for the viewer's starred repositories.

mod client;
mod convert;
mod error;
mod types;

pub use client::GithubClient;
pub use error::GithubError;
