//! Extraction result validation.
//!
//! The extraction backend is untrusted: it often returns partial objects,
//! stray scalars, or text that is not JSON at all. Everything that does not
//! amount to a meaningful record for the page's content type is dropped here.

use serde_json::Value;

use crate::models::{ContentType, ExtractedRecord, RecordFields};

/// Parse and filter a raw extraction payload into records.
///
/// Never fails: malformed input degrades to an empty list.
pub fn validate(raw: Option<&str>, content_type: ContentType) -> Vec<ExtractedRecord> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Error parsing extracted content: {}", e);
            return Vec::new();
        }
    };

    let objects: Vec<RecordFields> = match parsed {
        Value::Object(map) => vec![map],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        other => {
            log::warn!("Extracted content is neither an object nor a list: {}", other);
            return Vec::new();
        }
    };

    objects
        .into_iter()
        .map(strip_error_flag)
        .map(|fields| ExtractedRecord::new(content_type, fields))
        .filter(|record| {
            let valid = record.is_valid();
            if !valid {
                log::debug!("Dropping {} record without required fields", content_type);
            }
            valid
        })
        .collect()
}

/// Drop `"error": false`; it marks a successful extraction, not data.
fn strip_error_flag(mut fields: RecordFields) -> RecordFields {
    if fields.get("error") == Some(&Value::Bool(false)) {
        fields.remove("error");
    }
    fields
}
