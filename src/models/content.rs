// src/models/content.rs

//! Page-level content types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::ExtractedRecord;

/// Category of a page, driving the extraction schema and validity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Product,
    Listing,
    Profile,
    #[default]
    Unknown,
}

impl ContentType {
    /// All variants, in declaration order.
    pub const ALL: [ContentType; 5] = [
        ContentType::Article,
        ContentType::Product,
        ContentType::Listing,
        ContentType::Profile,
        ContentType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Product => "product",
            ContentType::Listing => "listing",
            ContentType::Profile => "profile",
            ContentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("Unknown content type: {s}")))
    }
}

/// One fetched page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageContent {
    /// URL the page was fetched from
    pub url: String,

    /// Page title (from fetch metadata)
    pub title: String,

    /// Page description (from fetch metadata)
    pub description: String,

    /// Raw textual content
    pub content: String,

    /// Content type in effect for this page
    pub content_type: ContentType,

    /// Validated records, `None` when nothing survived extraction
    pub structured_data: Option<Vec<ExtractedRecord>>,
}

impl PageContent {
    /// Number of validated records on this page.
    pub fn record_count(&self) -> usize {
        self.structured_data.as_ref().map_or(0, Vec::len)
    }

    /// Length of the raw content in characters.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round_trips_through_str() {
        for tag in ContentType::ALL {
            assert_eq!(tag.as_str().parse::<ContentType>().unwrap(), tag);
        }
        assert_eq!("Product".parse::<ContentType>().unwrap(), ContentType::Product);
        assert!("video".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_content_type_serializes_lowercase() {
        let json = serde_json::to_string(&ContentType::Listing).unwrap();
        assert_eq!(json, "\"listing\"");
    }

    #[test]
    fn test_record_count_without_data() {
        let page = PageContent {
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            description: String::new(),
            content: "héllo".to_string(),
            content_type: ContentType::Unknown,
            structured_data: None,
        };
        assert_eq!(page.record_count(), 0);
        assert_eq!(page.content_length(), 5);
    }
}
