// src/services/fetcher.rs

//! Page fetching capability.
//!
//! The orchestration core only sees the [`PageFetcher`] trait. [`HttpFetcher`]
//! is the static-HTTP implementation: it downloads the page with `reqwest`,
//! reduces it to text with `scraper`, and optionally runs the LLM extraction
//! backend over that text.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, CrawlerConfig};
use crate::services::llm::LlmExtractor;
use crate::services::schema::ExtractionSchema;
use crate::utils::http;

/// Per-fetch settings.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Ask for a fresh copy instead of a cached one
    pub bypass_cache: bool,

    /// Fetches sharing a session share cookies
    pub session_id: String,

    /// Schema and instruction for LLM extraction, if requested
    pub extraction: Option<ExtractionSchema>,

    /// Restrict content to elements matching this CSS selector
    pub css_selector: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bypass_cache: true,
            session_id: "default_session".to_string(),
            extraction: None,
            css_selector: None,
        }
    }
}

impl RunConfig {
    /// Run settings taken from the crawler configuration.
    pub fn from_crawler(config: &CrawlerConfig) -> Self {
        Self {
            bypass_cache: config.bypass_cache,
            session_id: config.session_id.clone(),
            extraction: None,
            css_selector: config.css_selector.clone(),
        }
    }
}

/// Outcome of a single fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    pub success: bool,
    pub content: String,
    pub metadata: HashMap<String, String>,
    /// Raw extraction payload, present only when extraction ran
    pub raw_extraction: Option<String>,
    pub error_message: Option<String>,
}

impl FetchResponse {
    /// A failed fetch with an explanation.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Capability to fetch a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Check the fetcher can serve requests. Called once before a run.
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch `url` with the given run settings.
    async fn fetch(&self, url: &str, config: &RunConfig) -> Result<FetchResponse>;
}

/// Static HTTP fetcher backed by `reqwest`.
pub struct HttpFetcher {
    crawler: CrawlerConfig,
    sessions: Mutex<HashMap<String, Client>>,
    extractor: Option<LlmExtractor>,
}

impl HttpFetcher {
    /// Create a fetcher, with an extraction backend when a credential exists.
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.crawler.timeout_secs);
        let extractor = LlmExtractor::from_config(&config.extraction, timeout)?;
        Ok(Self::with_extractor(&config.crawler, extractor))
    }

    /// Create a fetcher with an explicit extraction backend.
    ///
    /// No client is built until [`PageFetcher::ensure_ready`] or the first fetch.
    pub fn with_extractor(crawler: &CrawlerConfig, extractor: Option<LlmExtractor>) -> Self {
        Self {
            crawler: crawler.clone(),
            sessions: Mutex::new(HashMap::new()),
            extractor,
        }
    }

    /// Client bound to a session, created on first use.
    fn client_for(&self, session_id: &str) -> Result<Client> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = sessions.get(session_id) {
            return Ok(client.clone());
        }

        let client = http::create_client(&self.crawler)?;
        sessions.insert(session_id.to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn ensure_ready(&self) -> Result<()> {
        self.client_for(&self.crawler.session_id)
            .map(|_| ())
            .map_err(|e| {
                AppError::not_ready(format!(
                    "session '{}' could not start: {}",
                    self.crawler.session_id, e
                ))
            })
    }

    async fn fetch(&self, url: &str, config: &RunConfig) -> Result<FetchResponse> {
        let client = self.client_for(&config.session_id)?;
        let mut request = client.get(url);
        if config.bypass_cache {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(FetchResponse::failure(format!("HTTP {status}")));
        }

        let html = response.text().await?;
        let page = parse_page(&html, config.css_selector.as_deref())?;

        let raw_extraction = match (&config.extraction, &self.extractor) {
            (Some(schema), Some(extractor)) => match extractor.extract(&page.content, schema).await {
                Ok(raw) => Some(raw),
                Err(e) => {
                    log::warn!("LLM extraction failed for {}: {}", url, e);
                    None
                }
            },
            (Some(_), None) => {
                log::debug!("Extraction requested for {} but no backend is configured", url);
                None
            }
            (None, _) => None,
        };

        let mut metadata = HashMap::new();
        metadata.insert("status".to_string(), status.as_u16().to_string());
        if let Some(title) = page.title {
            metadata.insert("title".to_string(), title);
        }
        if let Some(description) = page.description {
            metadata.insert("description".to_string(), description);
        }

        Ok(FetchResponse {
            success: true,
            content: page.content,
            metadata,
            raw_extraction,
            error_message: None,
        })
    }
}

/// Text pulled out of an HTML document.
#[derive(Debug, Default, PartialEq)]
struct ParsedPage {
    title: Option<String>,
    description: Option<String>,
    content: String,
}

fn parse_page(html: &str, css_selector: Option<&str>) -> Result<ParsedPage> {
    let document = Html::parse_document(html);

    let title = document
        .select(&parse_selector("title")?)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let description = document
        .select(&parse_selector("meta[name=\"description\"]")?)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(normalize_whitespace)
        .filter(|d| !d.is_empty());

    let content = match css_selector {
        Some(selector) => {
            let selector = parse_selector(selector)?;
            document
                .select(&selector)
                .map(visible_text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        }
        None => document
            .select(&parse_selector("body")?)
            .next()
            .map(visible_text)
            .unwrap_or_default(),
    };

    Ok(ParsedPage {
        title,
        description,
        content,
    })
}

/// Text of an element, skipping script-like children.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().is_some_and(|el| {
                matches!(el.name(), "script" | "style" | "noscript" | "template")
            })
        });
        if !hidden {
            parts.push(text);
        }
    }
    normalize_whitespace(&parts.join(" "))
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
