//! Mapping from stored rows to typed content entities.
//!
//! The store hands back a row whose `document` column is a loosely-typed
//! JSON bag; [`map_post`] turns row + bag into a [`ContentItem`] with a
//! fully typed block sequence. Mapping is strict about block type tags
//! (see [`map_blocks`]) and lenient about optional scalar fields.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::post::PostRow;

use super::block::{ContentBlock, MappingError, map_blocks};

/// Placeholder shown when an author never filled in a read time.
pub const DEFAULT_READ_TIME: &str = "5 min read";

/// A fully mapped article or tutorial.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    pub slug: String,
    /// `"post"` or `"tutorial"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub related_posts: Vec<String>,
    pub read_time: String,
    pub published: bool,
    pub created: i64,
    pub updated: i64,
    pub views: i64,
    pub likes: i64,
    pub author_id: Uuid,
    pub blocks: Vec<ContentBlock>,
}

impl ContentItem {
    /// Timestamp used for recency ordering: last update, falling back to
    /// creation for rows that were never edited.
    pub fn recency(&self) -> i64 {
        if self.updated != 0 {
            self.updated
        } else {
            self.created
        }
    }
}

/// Map a stored row into a [`ContentItem`].
///
/// `title` and `description` are required; array fields default to empty
/// and `readTime` to [`DEFAULT_READ_TIME`]. The first unrecognized block
/// aborts the whole record.
pub fn map_post(row: &PostRow) -> Result<ContentItem, MappingError> {
    let doc = &row.document;

    let title = required_str(doc, "title")?;
    let description = required_str(doc, "description")?;

    let blocks = match doc.get("blocks").and_then(Value::as_array) {
        Some(raw) => map_blocks(raw)?,
        None => Vec::new(),
    };

    Ok(ContentItem {
        id: row.id,
        slug: row.slug.clone(),
        kind: row.kind.clone(),
        title,
        description,
        category: optional_str(doc, "category"),
        level: optional_str(doc, "level"),
        tags: str_array(doc, "tags"),
        keywords: str_array(doc, "keywords"),
        related_posts: str_array(doc, "relatedPosts"),
        read_time: optional_str(doc, "readTime")
            .unwrap_or_else(|| DEFAULT_READ_TIME.to_string()),
        published: row.published,
        created: row.created,
        updated: row.updated,
        views: row.views,
        likes: row.likes,
        author_id: row.author_id,
        blocks,
    })
}

/// Map a batch of rows, aborting on the first record that fails.
pub fn map_posts(rows: &[PostRow]) -> Result<Vec<ContentItem>, MappingError> {
    rows.iter().map(map_post).collect()
}

fn required_str(doc: &Value, key: &'static str) -> Result<String, MappingError> {
    doc.get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or(MappingError::MissingField(key))
}

fn optional_str(doc: &Value, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn str_array(doc: &Value, key: &str) -> Vec<String> {
    doc.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_with_document(document: Value) -> PostRow {
        PostRow {
            id: Uuid::now_v7(),
            slug: "test-post".to_string(),
            kind: "post".to_string(),
            published: true,
            deleted: false,
            created: 1_700_000_000,
            updated: 1_700_100_000,
            views: 3,
            likes: 1,
            author_id: Uuid::nil(),
            document,
        }
    }

    #[test]
    fn maps_a_full_document() {
        let row = row_with_document(json!({
            "title": "Swift Concurrency in Practice",
            "description": "async/await beyond the basics",
            "category": "Concurrency",
            "level": "intermediate",
            "tags": ["Swift", "Concurrency"],
            "keywords": ["async", "await"],
            "relatedPosts": ["actors-deep-dive"],
            "readTime": "12 min read",
            "blocks": [
                {"type": "paragraph", "text": "hi"},
                {"type": "code", "language": "swift", "code": "Task { }"}
            ]
        }));

        let item = map_post(&row).unwrap();
        assert_eq!(item.title, "Swift Concurrency in Practice");
        assert_eq!(item.level.as_deref(), Some("intermediate"));
        assert_eq!(item.tags, vec!["Swift", "Concurrency"]);
        assert_eq!(item.read_time, "12 min read");
        assert_eq!(item.blocks.len(), 2);
    }

    #[test]
    fn defaults_for_missing_optional_fields() {
        let row = row_with_document(json!({
            "title": "Bare",
            "description": "minimal document"
        }));

        let item = map_post(&row).unwrap();
        assert!(item.tags.is_empty());
        assert!(item.keywords.is_empty());
        assert!(item.related_posts.is_empty());
        assert!(item.blocks.is_empty());
        assert_eq!(item.read_time, DEFAULT_READ_TIME);
        assert_eq!(item.category, None);
    }

    #[test]
    fn missing_title_fails() {
        let row = row_with_document(json!({"description": "no title"}));
        assert_eq!(
            map_post(&row).unwrap_err(),
            MappingError::MissingField("title")
        );
    }

    #[test]
    fn bad_block_poisons_the_record() {
        let row = row_with_document(json!({
            "title": "t",
            "description": "d",
            "blocks": [{"type": "paragraph", "text": "ok"}, {"type": "bogus"}]
        }));
        assert_eq!(
            map_post(&row).unwrap_err(),
            MappingError::UnknownBlockType("bogus".to_string())
        );
    }

    #[test]
    fn recency_prefers_updated() {
        let row = row_with_document(json!({"title": "t", "description": "d"}));
        let mut item = map_post(&row).unwrap();
        assert_eq!(item.recency(), 1_700_100_000);
        item.updated = 0;
        assert_eq!(item.recency(), item.created);
    }
}
