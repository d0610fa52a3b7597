// src/pipeline/links.rs

//! Deep-link expansion.
//!
//! Follows links found inside extracted records and attaches what was
//! extracted from each linked page under `extracted_from_links`.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::Value;

use crate::models::{ContentType, DeepLinkRecord, ExtractedRecord};
use crate::pipeline::PageScraper;
use crate::utils::is_http_url;

/// Follows links embedded in records, one at a time.
#[derive(Clone)]
pub struct LinkExpander {
    scraper: PageScraper,
    delay: Duration,
}

impl LinkExpander {
    /// `delay` is slept between consecutive link fetches.
    pub fn new(scraper: PageScraper, delay: Duration) -> Self {
        Self { scraper, delay }
    }

    /// Return copies of `records` with deep-link results attached.
    ///
    /// Each record gets its own link budget of `max_links_per_page`. A link
    /// that fails to fetch is skipped.
    pub async fn expand(
        &self,
        records: &[ExtractedRecord],
        max_links_per_page: usize,
        use_llm: bool,
        content_type: Option<ContentType>,
    ) -> Vec<ExtractedRecord> {
        if records.is_empty() || max_links_per_page == 0 {
            return records.to_vec();
        }

        let mut expanded = Vec::with_capacity(records.len());
        let mut fetched_any = false;

        for record in records {
            let mut followed = Vec::new();

            for link in select_links(record, max_links_per_page) {
                if fetched_any && !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                fetched_any = true;

                log::info!("  Following link: {}", link);
                match self.scraper.scrape(&link, use_llm, content_type).await {
                    Ok(page) => followed.push(DeepLinkRecord::from_page(&link, &page)),
                    Err(e) => log::warn!("    Error following link {}: {}", link, e),
                }
            }

            expanded.push(record.with_links(&followed));
        }

        expanded
    }
}

/// Links to follow for `record`: http(s) only, deduplicated in first-seen
/// order, at most `max_links`.
pub fn select_links(record: &ExtractedRecord, max_links: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    candidate_links(record)
        .iter()
        .filter_map(Value::as_str)
        .filter(|link| is_http_url(link))
        .filter(|link| seen.insert(*link))
        .take(max_links)
        .map(str::to_string)
        .collect()
}

/// Raw link list of a record: `structured_data[0].links` when non-empty,
/// otherwise the top-level `links`.
fn candidate_links(record: &ExtractedRecord) -> &[Value] {
    let nested = record
        .get("structured_data")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|first| first.get("links"))
        .and_then(Value::as_array)
        .filter(|links| !links.is_empty());

    nested
        .or_else(|| record.get("links").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
