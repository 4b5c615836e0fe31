//! Typed content blocks.
//!
//! Article and tutorial bodies are ordered sequences of typed blocks.
//! Stored documents carry blocks as loosely-typed JSON bags; [`map_block`]
//! converts one bag into the closed [`ContentBlock`] sum type. A bag whose
//! `type` tag is not one of the five recognized values is a
//! [`MappingError`] — mapping of the whole record aborts rather than
//! skipping the block.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One typed unit of body content. Immutable once mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Heading {
        level: u8,
        text: String,
    },
    Code {
        language: String,
        code: String,
    },
    List {
        items: Vec<String>,
    },
    Image {
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

/// Failure to map a raw stored record into a typed entity.
///
/// Fatal for the record being mapped; there is no skip-and-continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("unrecognized content block type {0:?}")]
    UnknownBlockType(String),

    #[error("content block has no type tag")]
    MissingBlockType,

    #[error("document is missing required field {0:?}")]
    MissingField(&'static str),
}

/// Map one raw block bag into a [`ContentBlock`].
///
/// Payload fields are best-effort: a paragraph without `text` maps to an
/// empty paragraph. Only the `type` tag is validated strictly.
pub fn map_block(raw: &Value) -> Result<ContentBlock, MappingError> {
    let tag = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MappingError::MissingBlockType)?;

    match tag {
        "paragraph" => Ok(ContentBlock::Paragraph {
            text: str_field(raw, "text"),
        }),
        "heading" => Ok(ContentBlock::Heading {
            // Clamp to the h1..h6 range the reader renders.
            level: raw
                .get("level")
                .and_then(Value::as_u64)
                .unwrap_or(2)
                .clamp(1, 6) as u8,
            text: str_field(raw, "text"),
        }),
        "code" => Ok(ContentBlock::Code {
            language: str_field(raw, "language"),
            code: str_field(raw, "code"),
        }),
        "list" => Ok(ContentBlock::List {
            items: raw
                .get("items")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }),
        "image" => Ok(ContentBlock::Image {
            src: str_field(raw, "src"),
            alt: str_field(raw, "alt"),
            caption: raw
                .get("caption")
                .and_then(Value::as_str)
                .map(String::from),
        }),
        other => Err(MappingError::UnknownBlockType(other.to_string())),
    }
}

/// Map an array of raw block bags, aborting on the first bad block.
pub fn map_blocks(raw: &[Value]) -> Result<Vec<ContentBlock>, MappingError> {
    raw.iter().map(map_block).collect()
}

fn str_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_paragraph() {
        let block = map_block(&json!({"type": "paragraph", "text": "hi"})).unwrap();
        assert_eq!(
            block,
            ContentBlock::Paragraph {
                text: "hi".to_string()
            }
        );
    }

    #[test]
    fn maps_heading_with_level_clamped() {
        let block = map_block(&json!({"type": "heading", "level": 9, "text": "Intro"})).unwrap();
        assert_eq!(
            block,
            ContentBlock::Heading {
                level: 6,
                text: "Intro".to_string()
            }
        );
    }

    #[test]
    fn heading_level_defaults_to_two() {
        let block = map_block(&json!({"type": "heading", "text": "Setup"})).unwrap();
        assert!(matches!(block, ContentBlock::Heading { level: 2, .. }));
    }

    #[test]
    fn maps_code_block() {
        let block = map_block(&json!({
            "type": "code",
            "language": "swift",
            "code": "let x = 1"
        }))
        .unwrap();
        assert_eq!(
            block,
            ContentBlock::Code {
                language: "swift".to_string(),
                code: "let x = 1".to_string()
            }
        );
    }

    #[test]
    fn maps_list_dropping_non_strings() {
        let block = map_block(&json!({"type": "list", "items": ["a", 1, "b"]})).unwrap();
        assert_eq!(
            block,
            ContentBlock::List {
                items: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn maps_image_with_optional_caption() {
        let block = map_block(&json!({"type": "image", "src": "/x.png", "alt": "x"})).unwrap();
        assert_eq!(
            block,
            ContentBlock::Image {
                src: "/x.png".to_string(),
                alt: "x".to_string(),
                caption: None
            }
        );
    }

    #[test]
    fn unknown_type_is_a_mapping_error() {
        let err = map_block(&json!({"type": "bogus", "text": "hi"})).unwrap_err();
        assert_eq!(err, MappingError::UnknownBlockType("bogus".to_string()));
    }

    #[test]
    fn missing_type_is_a_mapping_error() {
        let err = map_block(&json!({"text": "hi"})).unwrap_err();
        assert_eq!(err, MappingError::MissingBlockType);
    }

    #[test]
    fn one_bad_block_aborts_the_sequence() {
        let raw = vec![
            json!({"type": "paragraph", "text": "ok"}),
            json!({"type": "bogus"}),
            json!({"type": "paragraph", "text": "never reached"}),
        ];
        assert!(map_blocks(&raw).is_err());
    }

    #[test]
    fn block_serializes_with_type_tag() {
        let block = ContentBlock::Paragraph {
            text: "hi".to_string(),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value, json!({"type": "paragraph", "text": "hi"}));
    }
}
