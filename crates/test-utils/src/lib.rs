//! Segue test utilities.
//!
//! Builders for the raw JSON content documents the kernel's mapper
//! consumes, so tests can assemble realistic stored records without
//! hand-writing JSON in every test.

use serde_json::{Value, json};

/// Raw paragraph block bag.
pub fn paragraph(text: &str) -> Value {
    json!({ "type": "paragraph", "text": text })
}

/// Raw heading block bag.
pub fn heading(level: u8, text: &str) -> Value {
    json!({ "type": "heading", "level": level, "text": text })
}

/// Raw code block bag.
pub fn code(language: &str, code: &str) -> Value {
    json!({ "type": "code", "language": language, "code": code })
}

/// Raw list block bag.
pub fn list(items: &[&str]) -> Value {
    json!({ "type": "list", "items": items })
}

/// Raw image block bag.
pub fn image(src: &str, alt: &str) -> Value {
    json!({ "type": "image", "src": src, "alt": alt })
}

/// Builder for a raw content document.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    doc: Value,
}

/// Start a document with the two required fields.
pub fn document(title: &str, description: &str) -> DocumentBuilder {
    DocumentBuilder {
        doc: json!({
            "title": title,
            "description": description,
        }),
    }
}

impl DocumentBuilder {
    /// Add a tag to the document's tag set.
    pub fn tag(mut self, tag: &str) -> Self {
        self.push_to("tags", json!(tag));
        self
    }

    /// Add a keyword.
    pub fn keyword(mut self, keyword: &str) -> Self {
        self.push_to("keywords", json!(keyword));
        self
    }

    /// Add a related post slug.
    pub fn related(mut self, slug: &str) -> Self {
        self.push_to("relatedPosts", json!(slug));
        self
    }

    /// Append a raw block bag.
    pub fn block(mut self, block: Value) -> Self {
        self.push_to("blocks", block);
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.doc["category"] = json!(category);
        self
    }

    /// Set the tutorial level.
    pub fn level(mut self, level: &str) -> Self {
        self.doc["level"] = json!(level);
        self
    }

    /// Set the read time.
    pub fn read_time(mut self, read_time: &str) -> Self {
        self.doc["readTime"] = json!(read_time);
        self
    }

    /// Finish and return the raw document.
    pub fn build(self) -> Value {
        self.doc
    }

    fn push_to(&mut self, key: &str, value: Value) {
        match self.doc.get_mut(key).and_then(Value::as_array_mut) {
            Some(array) => array.push(value),
            None => {
                self.doc[key] = json!([value]);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_arrays() {
        let doc = document("Title", "Desc")
            .tag("SwiftUI")
            .tag("iOS")
            .block(paragraph("hello"))
            .build();

        assert_eq!(doc["tags"].as_array().unwrap().len(), 2);
        assert_eq!(doc["blocks"][0]["type"], "paragraph");
    }

    #[test]
    fn scalar_setters_overwrite() {
        let doc = document("T", "D").level("beginner").level("advanced").build();
        assert_eq!(doc["level"], "advanced");
    }
}
