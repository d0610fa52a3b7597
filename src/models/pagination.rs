// src/models/pagination.rs

//! Pagination run inputs and outputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ContentType, ExtractedRecord};

/// Why a pagination run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxPagesReached,
    NoResultsDetected,
    FetchError,
    EmptyPage,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::MaxPagesReached => "max_pages_reached",
            StopReason::NoResultsDetected => "no_results_detected",
            StopReason::FetchError => "fetch_error",
            StopReason::EmptyPage => "empty_page",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one pagination run.
#[derive(Debug, Clone)]
pub struct PaginationRequest {
    pub base_url: String,
    pub max_pages: usize,
    pub use_llm: bool,
    /// Explicit content type; the generic schema is used when absent
    pub content_type: Option<ContentType>,
    pub follow_links: bool,
    pub max_links_per_page: usize,
}

impl PaginationRequest {
    /// Request with the crawler's documented defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_pages: 10,
            use_llm: true,
            content_type: None,
            follow_links: false,
            max_links_per_page: 5,
        }
    }
}

/// Records accumulated over a pagination run.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationResult {
    pub records: Vec<ExtractedRecord>,
    pub total_items: usize,
    /// Number of page fetches attempted
    pub pages_fetched: usize,
    pub stop_reason: StopReason,
}

impl PaginationResult {
    pub fn new(records: Vec<ExtractedRecord>, pages_fetched: usize, stop_reason: StopReason) -> Self {
        Self {
            total_items: records.len(),
            records,
            pages_fetched,
            stop_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_wire_names() {
        let json = serde_json::to_string(&StopReason::NoResultsDetected).unwrap();
        assert_eq!(json, "\"no_results_detected\"");
        assert_eq!(StopReason::MaxPagesReached.to_string(), "max_pages_reached");
    }

    #[test]
    fn test_result_counts_records() {
        let result = PaginationResult::new(Vec::new(), 1, StopReason::EmptyPage);
        assert_eq!(result.total_items, 0);
        assert_eq!(result.pages_fetched, 1);
    }
}
