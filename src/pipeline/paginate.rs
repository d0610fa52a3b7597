// src/pipeline/paginate.rs

//! Pagination control loop.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, PaginationRequest, PaginationResult, StopReason};
use crate::pipeline::{LinkExpander, PageScraper};
use crate::services::{NoResultsDetector, PageFetcher};
use crate::utils::page_url;

/// Drives a multi-page crawl over `?page=N` URLs.
pub struct Paginator {
    scraper: PageScraper,
    expander: LinkExpander,
    detector: NoResultsDetector,
}

impl Paginator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        Self::with_scraper(PageScraper::new(fetcher, config), config)
    }

    /// Build around an already configured scraper.
    pub fn with_scraper(scraper: PageScraper, config: &Config) -> Self {
        let delay = Duration::from_millis(config.crawler.link_delay_ms);
        Self {
            expander: LinkExpander::new(scraper.clone(), delay),
            scraper,
            detector: NoResultsDetector::from_config(
                config.pagination.no_results_phrases.as_deref(),
            ),
        }
    }

    /// Crawl pages until a stop condition is met.
    ///
    /// Only a fetcher that is not ready fails the run. Once pages are being
    /// fetched, every problem ends the loop with a [`StopReason`] and the
    /// records gathered so far are returned.
    pub async fn run(&self, request: &PaginationRequest) -> Result<PaginationResult> {
        self.scraper.ensure_ready().await?;

        let mut records = Vec::new();
        let mut page_number = 1;
        let mut pages_fetched = 0;

        let stop_reason = loop {
            if page_number > request.max_pages {
                break StopReason::MaxPagesReached;
            }

            let url = page_url(&request.base_url, page_number);
            log::info!("Scraping page {}: {}", page_number, url);
            pages_fetched += 1;

            let page = match self
                .scraper
                .scrape(&url, request.use_llm, request.content_type)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("Error scraping page {}: {}", page_number, e);
                    break StopReason::FetchError;
                }
            };

            if !page.content.is_empty() && self.detector.detect(&page.content) {
                log::info!("No more results found on page {}", page_number);
                break StopReason::NoResultsDetected;
            }

            match page.structured_data {
                Some(page_records) => {
                    let page_records = if request.follow_links {
                        self.expander
                            .expand(
                                &page_records,
                                request.max_links_per_page,
                                request.use_llm,
                                request.content_type,
                            )
                            .await
                    } else {
                        page_records
                    };
                    log::info!("Found {} items on page {}", page_records.len(), page_number);
                    records.extend(page_records);
                }
                // An empty LLM extraction means the listing is exhausted.
                None if request.use_llm => {
                    log::info!("No structured data found on page {}", page_number);
                    break StopReason::EmptyPage;
                }
                // Without LLM extraction an empty page proves nothing; keep going.
                None => {
                    log::info!("No structured data found on page {}", page_number);
                }
            }

            page_number += 1;
        };

        log::info!(
            "Total items extracted: {} ({})",
            records.len(),
            stop_reason
        );
        Ok(PaginationResult::new(records, pages_fetched, stop_reason))
    }
}
