//! Normalization of GraphQL star edges into domain records.

use crate::record::RepositoryRecord;

use super::types::StarEdge;

/// Flatten one star edge into a [`RepositoryRecord`].
///
/// Topics beyond `topic_limit` are dropped; absent or null topic and
/// language connections normalize to empty. The starred-at timestamp comes
/// from the edge, not the repository node.
pub fn to_record(edge: StarEdge, topic_limit: u32) -> RepositoryRecord {
    let StarEdge { starred_at, node } = edge;

    let topics = node
        .repository_topics
        .and_then(|conn| conn.nodes)
        .unwrap_or_default()
        .into_iter()
        .take(topic_limit as usize)
        .map(|n| n.topic.name)
        .collect();

    RepositoryRecord {
        name_with_owner: node.name_with_owner,
        url: node.url,
        description: node.description,
        primary_language: node.primary_language.map(|l| l.name),
        starred_at,
        updated_at: node.updated_at,
        stargazer_count: node.stargazer_count,
        topics,
    }
}
