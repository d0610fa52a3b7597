//! pagecrawl CLI
//!
//! Scrape a single page or crawl a paginated listing, with optional LLM
//! structured-data extraction.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use pagecrawl::{
    error::Result,
    models::{Config, ContentType, ExtractedRecord, PaginationRequest, StopReason},
    pipeline::{PageScraper, Paginator},
    services::HttpFetcher,
};
use serde::Serialize;

/// pagecrawl - Web scraper with LLM extraction
#[derive(Parser, Debug)]
#[command(
    name = "pagecrawl",
    version,
    about = "Web scraper with LLM structured-data extraction"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "pagecrawl.toml")]
    config: PathBuf,

    /// Output file (JSON); printed to stdout when omitted
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a single page
    Scrape {
        /// URL to scrape
        url: String,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },

    /// Scrape a listing page by page (`?page=N`)
    Paginate {
        /// Base URL of the listing
        url: String,

        #[command(flatten)]
        extraction: ExtractionArgs,

        /// Maximum pages to scrape
        #[arg(long)]
        max_pages: Option<usize>,

        /// Follow links found in extracted data for deeper extraction
        #[arg(long)]
        follow_links: bool,

        /// Maximum links to follow per record
        #[arg(long)]
        max_links: Option<usize>,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Args, Debug)]
struct ExtractionArgs {
    /// Use LLM for structured data extraction
    #[arg(long)]
    llm: bool,

    /// Content type for targeted LLM extraction
    #[arg(short = 't', long, value_parser = parse_content_type)]
    content_type: Option<ContentType>,

    /// CSS selector to target specific content
    #[arg(long)]
    css_selector: Option<String>,
}

#[derive(Serialize)]
struct ScrapeReport {
    url: String,
    title: String,
    description: String,
    content_type: ContentType,
    content_length: usize,
    content_preview: String,
    llm_used: bool,
    structured_data_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    structured_data: Option<Vec<ExtractedRecord>>,
}

#[derive(Serialize)]
struct PaginationReport {
    url: String,
    scraping_mode: &'static str,
    total_items: usize,
    pages_fetched: usize,
    stop_reason: StopReason,
    items: Vec<ExtractedRecord>,
    llm_used: bool,
    content_type: ContentType,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

const PREVIEW_CHARS: usize = 500;

fn parse_content_type(s: &str) -> std::result::Result<ContentType, String> {
    s.parse().map_err(|e: pagecrawl::error::AppError| e.to_string())
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Print the report or write it to `output`.
fn emit<T: Serialize>(report: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Results saved to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Scrape { url, extraction } => {
            if let Some(selector) = extraction.css_selector {
                config.crawler.css_selector = Some(selector);
            }
            config.validate()?;
            let fetcher = Arc::new(HttpFetcher::new(&config)?);
            let scraper = PageScraper::new(fetcher, &config);
            scraper.ensure_ready().await?;

            let page = scraper
                .scrape(&url, extraction.llm, extraction.content_type)
                .await?;

            let report = ScrapeReport {
                content_length: page.content_length(),
                content_preview: preview(&page.content),
                structured_data_count: page.record_count(),
                url: page.url,
                title: page.title,
                description: page.description,
                content_type: page.content_type,
                llm_used: extraction.llm,
                structured_data: page.structured_data,
            };
            emit(&report, cli.output.as_ref())?;
        }

        Command::Paginate {
            url,
            extraction,
            max_pages,
            follow_links,
            max_links,
        } => {
            if let Some(selector) = extraction.css_selector {
                config.crawler.css_selector = Some(selector);
            }
            config.validate()?;
            let request = PaginationRequest {
                base_url: url.clone(),
                max_pages: max_pages.unwrap_or(config.pagination.max_pages),
                use_llm: extraction.llm,
                content_type: extraction.content_type,
                follow_links,
                max_links_per_page: max_links.unwrap_or(config.pagination.max_links_per_page),
            };

            log::info!(
                "Starting pagination scraping (max {} pages)...",
                request.max_pages
            );
            let started_at = Utc::now();
            let fetcher = Arc::new(HttpFetcher::new(&config)?);
            let result = Paginator::new(fetcher, &config).run(&request).await?;

            let report = PaginationReport {
                url,
                scraping_mode: "pagination",
                total_items: result.total_items,
                pages_fetched: result.pages_fetched,
                stop_reason: result.stop_reason,
                items: result.records,
                llm_used: extraction.llm,
                content_type: extraction.content_type.unwrap_or_default(),
                started_at,
                finished_at: Utc::now(),
            };
            emit(&report, cli.output.as_ref())?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            let config = Config::load(&cli.config)?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            if config.extraction.is_available() {
                log::info!("✓ Extraction credential found");
            } else {
                log::warn!(
                    "{} not set; LLM extraction will be skipped",
                    config.extraction.api_key_env
                );
            }

            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
