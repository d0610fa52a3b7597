//! Extraction schema selection.
//!
//! Maps a [`ContentType`] to the JSON schema and instruction handed to the
//! LLM extraction backend. Whether a backend is available at all is decided
//! by the caller (see [`ExtractionConfig::is_available`]).
//!
//! [`ExtractionConfig::is_available`]: crate::models::ExtractionConfig::is_available

use serde::Serialize;
use serde_json::{Value, json};

use crate::models::ContentType;

/// Schema and instruction for one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSchema {
    /// JSON schema of a single record
    pub schema: Value,

    /// Natural-language instruction for the model
    pub instruction: String,
}

/// Select the extraction schema for `content_type`.
///
/// A caller-supplied schema is used only when both the schema and the
/// instruction are given; otherwise the canonical pair for the type applies.
pub fn select(
    content_type: ContentType,
    override_schema: Option<Value>,
    override_instruction: Option<String>,
) -> ExtractionSchema {
    if let (Some(schema), Some(instruction)) = (override_schema, override_instruction) {
        return ExtractionSchema {
            schema,
            instruction,
        };
    }

    match content_type {
        ContentType::Article => ExtractionSchema {
            schema: article_schema(),
            instruction: "Extract article information including title, author, publish date, \
                          main content, tags, and category from the following content."
                .to_string(),
        },
        ContentType::Product => ExtractionSchema {
            schema: product_schema(),
            instruction: "Extract product information including name, price, description, \
                          rating, number of reviews, availability status, and image URLs \
                          from the following content."
                .to_string(),
        },
        ContentType::Profile => ExtractionSchema {
            schema: contact_schema(),
            instruction: "Extract contact information including name, email, phone, \
                          address, and website from the following content."
                .to_string(),
        },
        ContentType::Listing | ContentType::Unknown => ExtractionSchema {
            schema: generic_schema(),
            instruction: "Extract general information including title, description, \
                          main content, links, images, and any relevant metadata \
                          from the following content."
                .to_string(),
        },
    }
}

fn string_field() -> Value {
    json!({ "type": "string" })
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn article_schema() -> Value {
    json!({
        "title": "Article",
        "type": "object",
        "properties": {
            "title": string_field(),
            "author": string_field(),
            "publish_date": string_field(),
            "content": string_field(),
            "tags": string_list(),
            "category": string_field(),
        },
        "required": ["title", "content"],
    })
}

fn product_schema() -> Value {
    json!({
        "title": "Product",
        "type": "object",
        "properties": {
            "name": string_field(),
            "price": string_field(),
            "description": string_field(),
            "rating": { "type": "number" },
            "reviews": { "type": "integer" },
            "availability": string_field(),
            "images": string_list(),
        },
        "required": ["name"],
    })
}

fn contact_schema() -> Value {
    json!({
        "title": "Contact",
        "type": "object",
        "properties": {
            "name": string_field(),
            "email": string_field(),
            "phone": string_field(),
            "address": string_field(),
            "website": string_field(),
        },
        "required": [],
    })
}

fn generic_schema() -> Value {
    json!({
        "title": "GenericData",
        "type": "object",
        "properties": {
            "title": string_field(),
            "description": string_field(),
            "content": string_field(),
            "links": string_list(),
            "images": string_list(),
            "metadata": { "type": "object" },
        },
        "required": [],
    })
}
