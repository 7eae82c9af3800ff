//! Mapping domain records onto the Notion database schema.

use serde_json::{Value, json};

use crate::record::RepositoryRecord;

/// Notion's hard limit on a single rich-text value.
pub const MAX_RICH_TEXT_LEN: usize = 2000;

/// Truncate `text` to fit a Notion rich-text field, marking the cut with an
/// ellipsis. Counted in characters, not bytes, matching how the limit is
/// enforced server-side.
pub fn truncate_rich_text(text: &str) -> String {
    if text.chars().count() < MAX_RICH_TEXT_LEN {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_RICH_TEXT_LEN - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Build the property payload for creating one page.
pub fn page_properties(record: &RepositoryRecord) -> Value {
    json!({
        "Name": {
            "title": [{ "text": { "content": record.name_with_owner } }]
        },
        "Link": { "url": record.url },
        "Description": {
            "rich_text": [{
                "text": {
                    "content": truncate_rich_text(record.description.as_deref().unwrap_or(""))
                }
            }]
        },
        "Primary Language": {
            "rich_text": [{
                "text": { "content": record.primary_language.as_deref().unwrap_or("") }
            }]
        },
        "Repository Topics": {
            "rich_text": [{ "text": { "content": record.topics.join(",") } }]
        },
        "Starred At": {
            "date": {
                "start": record.starred_at.to_rfc3339(),
                "end": record.starred_at.to_rfc3339(),
            }
        },
        "Stargazers": { "number": record.stargazer_count },
    })
}

/// Read a page's natural key back out of its title property.
///
/// Returns `None` for pages whose title is empty or shaped unexpectedly,
/// e.g. rows added to the database by hand.
pub fn page_title(properties: &Value) -> Option<String> {
    properties
        .get("Name")?
        .get("title")?
        .get(0)?
        .get("plain_text")?
        .as_str()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record() -> RepositoryRecord {
        RepositoryRecord {
            name_with_owner: "rust-lang/rust".to_string(),
            url: "https://github.com/rust-lang/rust".to_string(),
            description: Some("The Rust language".to_string()),
            primary_language: Some("Rust".to_string()),
            starred_at: Utc::now(),
            updated_at: Utc::now(),
            stargazer_count: 99_000,
            topics: vec!["compiler".to_string(), "language".to_string()],
        }
    }

    #[test]
    fn short_text_passes_through_untouched() {
        assert_eq!(truncate_rich_text("short"), "short");
    }

    #[test]
    fn long_text_is_cut_to_the_limit_with_an_ellipsis() {
        let long = "x".repeat(MAX_RICH_TEXT_LEN + 100);
        let truncated = truncate_rich_text(&long);

        assert_eq!(truncated.chars().count(), MAX_RICH_TEXT_LEN);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "é".repeat(MAX_RICH_TEXT_LEN);
        let truncated = truncate_rich_text(&long);
        assert_eq!(truncated.chars().count(), MAX_RICH_TEXT_LEN);
    }

    #[test]
    fn properties_carry_every_field() {
        let props = page_properties(&record());

        assert_eq!(
            props["Name"]["title"][0]["text"]["content"],
            "rust-lang/rust"
        );
        assert_eq!(props["Link"]["url"], "https://github.com/rust-lang/rust");
        assert_eq!(
            props["Repository Topics"]["rich_text"][0]["text"]["content"],
            "compiler,language"
        );
        assert_eq!(props["Stargazers"]["number"], 99_000);
    }

    #[test]
    fn absent_optionals_become_empty_strings() {
        let mut r = record();
        r.description = None;
        r.primary_language = None;
        let props = page_properties(&r);

        assert_eq!(props["Description"]["rich_text"][0]["text"]["content"], "");
        assert_eq!(
            props["Primary Language"]["rich_text"][0]["text"]["content"],
            ""
        );
    }

    #[test]
    fn title_reads_back_from_query_results() {
        let properties = serde_json::json!({
            "Name": { "title": [{ "plain_text": "rust-lang/rust" }] }
        });
        assert_eq!(page_title(&properties).as_deref(), Some("rust-lang/rust"));

        let untitled = serde_json::json!({ "Name": { "title": [] } });
        assert!(page_title(&untitled).is_none());
    }
}
