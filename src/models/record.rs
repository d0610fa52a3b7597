// src/models/record.rs

//! Structured records produced by LLM extraction.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::models::{ContentType, PageContent};

/// Open field map carried by every record variant.
pub type RecordFields = Map<String, Value>;

/// Key under which deep-link results are attached to a record.
pub const EXTRACTED_FROM_LINKS: &str = "extracted_from_links";

/// A validated unit of structured data pulled from a page.
///
/// The variant fixes which validity rule applies; the fields themselves stay
/// as returned by the extraction backend so nothing the model produced is lost.
/// Serializes as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedRecord {
    Article(RecordFields),
    Product(RecordFields),
    Profile(RecordFields),
    /// Listing and unknown pages
    Generic(RecordFields),
}

impl ExtractedRecord {
    /// Wrap a field map in the variant matching `content_type`.
    pub fn new(content_type: ContentType, fields: RecordFields) -> Self {
        match content_type {
            ContentType::Article => Self::Article(fields),
            ContentType::Product => Self::Product(fields),
            ContentType::Profile => Self::Profile(fields),
            ContentType::Listing | ContentType::Unknown => Self::Generic(fields),
        }
    }

    pub fn fields(&self) -> &RecordFields {
        match self {
            Self::Article(fields)
            | Self::Product(fields)
            | Self::Profile(fields)
            | Self::Generic(fields) => fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }

    /// Whether the record carries the fields its variant requires.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Article(f) => has_value(f, "title") && has_value(f, "content"),
            Self::Product(f) => has_value(f, "name"),
            Self::Profile(f) => ["name", "email", "phone"].iter().any(|k| has_value(f, k)),
            Self::Generic(f) => ["title", "description", "content", "name"]
                .iter()
                .any(|k| has_value(f, k)),
        }
    }

    /// Return a copy of this record with deep-link results attached.
    pub fn with_links(&self, links: &[DeepLinkRecord]) -> Self {
        let mut copy = self.clone();
        let attached = Value::Array(links.iter().map(DeepLinkRecord::to_value).collect());
        match &mut copy {
            Self::Article(f) | Self::Product(f) | Self::Profile(f) | Self::Generic(f) => {
                f.insert(EXTRACTED_FROM_LINKS.to_string(), attached);
            }
        }
        copy
    }

    /// Deep-link results attached by [`ExtractedRecord::with_links`].
    pub fn deep_links(&self) -> Option<&Vec<Value>> {
        self.get(EXTRACTED_FROM_LINKS).and_then(Value::as_array)
    }
}

/// Whether `key` holds a value that counts as present: non-empty string,
/// non-zero number, `true`, or a non-empty array/object.
pub fn has_value(fields: &RecordFields, key: &str) -> bool {
    match fields.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Data extracted from one followed link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepLinkRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub content_length: usize,
    pub structured_data: Option<Vec<ExtractedRecord>>,
}

impl DeepLinkRecord {
    /// Summarize a page fetched from `url`.
    pub fn from_page(url: &str, page: &PageContent) -> Self {
        Self {
            url: url.to_string(),
            title: page.title.clone(),
            description: page.description.clone(),
            content_length: page.content_length(),
            structured_data: page.structured_data.clone(),
        }
    }

    fn to_value(&self) -> Value {
        let structured = self.structured_data.as_ref().map_or(Value::Null, |records| {
            Value::Array(
                records
                    .iter()
                    .map(|r| Value::Object(r.fields().clone()))
                    .collect(),
            )
        });
        json!({
            "url": self.url,
            "title": self.title,
            "description": self.description,
            "content_length": self.content_length,
            "structured_data": structured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(value: Value) -> RecordFields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_product_requires_name() {
        let kept = ExtractedRecord::new(ContentType::Product, fields(json!({"name": "Widget"})));
        let dropped = ExtractedRecord::new(ContentType::Product, fields(json!({"price": "9.99"})));
        assert!(kept.is_valid());
        assert!(!dropped.is_valid());
    }

    #[test]
    fn test_article_requires_title_and_content() {
        let partial = ExtractedRecord::new(ContentType::Article, fields(json!({"title": "Hi"})));
        let full = ExtractedRecord::new(
            ContentType::Article,
            fields(json!({"title": "Hi", "content": "Body"})),
        );
        assert!(!partial.is_valid());
        assert!(full.is_valid());
    }

    #[test]
    fn test_listing_and_unknown_share_generic_rule() {
        let listing = ExtractedRecord::new(ContentType::Listing, fields(json!({"name": "Room A"})));
        assert!(matches!(listing, ExtractedRecord::Generic(_)));
        assert!(listing.is_valid());

        let empty = ExtractedRecord::new(ContentType::Unknown, fields(json!({"links": []})));
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_has_value_truthiness() {
        let f = fields(json!({
            "empty": "",
            "zero": 0,
            "list": ["a"],
            "no": false,
            "nil": null,
            "rating": 4.5
        }));
        assert!(!has_value(&f, "empty"));
        assert!(!has_value(&f, "zero"));
        assert!(has_value(&f, "list"));
        assert!(!has_value(&f, "no"));
        assert!(!has_value(&f, "nil"));
        assert!(has_value(&f, "rating"));
        assert!(!has_value(&f, "missing"));
    }

    #[test]
    fn test_with_links_leaves_original_untouched() {
        let record = ExtractedRecord::new(ContentType::Unknown, fields(json!({"title": "Top"})));
        let link = DeepLinkRecord {
            url: "https://example.com/a".to_string(),
            title: "A".to_string(),
            description: String::new(),
            content_length: 3,
            structured_data: None,
        };

        let expanded = record.with_links(&[link]);

        assert!(record.deep_links().is_none());
        let attached = expanded.deep_links().unwrap();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0]["url"], "https://example.com/a");
        assert_eq!(expanded.get("title"), record.get("title"));
    }

    #[test]
    fn test_serializes_flat() {
        let record = ExtractedRecord::new(ContentType::Product, fields(json!({"name": "Widget"})));
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"name": "Widget"}));
    }
}
