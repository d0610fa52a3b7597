//! Pipeline entry points for crawl operations.
//!
//! - `run_pagination`: Crawl `?page=N` pages until a stop condition
//! - `expand_links`: Follow links embedded in extracted records

pub mod links;
pub mod paginate;
pub mod scrape;

use std::sync::Arc;
use std::time::Duration;

pub use links::LinkExpander;
pub use paginate::Paginator;
pub use scrape::PageScraper;

use crate::error::Result;
use crate::models::{Config, ContentType, ExtractedRecord, PaginationRequest, PaginationResult};
use crate::services::PageFetcher;

/// Run one pagination crawl with settings from `config`.
pub async fn run_pagination(
    fetcher: Arc<dyn PageFetcher>,
    config: &Config,
    request: &PaginationRequest,
) -> Result<PaginationResult> {
    Paginator::new(fetcher, config).run(request).await
}

/// Follow links embedded in `records`, returning expanded copies.
pub async fn expand_links(
    fetcher: Arc<dyn PageFetcher>,
    config: &Config,
    records: &[ExtractedRecord],
    max_links_per_page: usize,
    use_llm: bool,
    content_type: Option<ContentType>,
) -> Vec<ExtractedRecord> {
    let scraper = PageScraper::new(fetcher, config);
    let delay = Duration::from_millis(config.crawler.link_delay_ms);
    LinkExpander::new(scraper, delay)
        .expand(records, max_links_per_page, use_llm, content_type)
        .await
}
