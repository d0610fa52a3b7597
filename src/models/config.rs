//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and fetch behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Pagination and link-following limits
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// LLM extraction backend settings
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.session_id.trim().is_empty() {
            return Err(AppError::validation("crawler.session_id is empty"));
        }
        if let Some(selector) = &self.crawler.css_selector {
            if let Err(e) = scraper::Selector::parse(selector) {
                return Err(AppError::config(format!(
                    "crawler.css_selector '{selector}' is invalid: {e:?}"
                )));
            }
        }
        if let Some(phrases) = &self.pagination.no_results_phrases {
            if phrases.iter().all(|p| p.trim().is_empty()) {
                return Err(AppError::validation(
                    "pagination.no_results_phrases must contain at least one phrase",
                ));
            }
        }
        if self.extraction.max_content_chars == 0 {
            return Err(AppError::validation(
                "extraction.max_content_chars must be > 0",
            ));
        }
        if self.extraction.base_url.trim().is_empty() {
            return Err(AppError::validation("extraction.base_url is empty"));
        }
        Ok(())
    }
}

/// HTTP client and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Session identifier; fetches sharing it share cookies
    #[serde(default = "defaults::session_id")]
    pub session_id: String,

    /// Ask intermediaries not to serve cached pages
    #[serde(default = "defaults::bypass_cache")]
    pub bypass_cache: bool,

    /// CSS selector restricting which part of the page is used as content
    #[serde(default)]
    pub css_selector: Option<String>,

    /// Delay between deep-link fetches in milliseconds
    #[serde(default = "defaults::link_delay")]
    pub link_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            session_id: defaults::session_id(),
            bypass_cache: defaults::bypass_cache(),
            css_selector: None,
            link_delay_ms: defaults::link_delay(),
        }
    }
}

/// Pagination limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Maximum number of pages per run
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Maximum links followed per record
    #[serde(default = "defaults::max_links_per_page")]
    pub max_links_per_page: usize,

    /// Replacement for the built-in "no results" phrase list
    #[serde(default)]
    pub no_results_phrases: Option<Vec<String>>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::max_pages(),
            max_links_per_page: defaults::max_links_per_page(),
            no_results_phrases: None,
        }
    }
}

/// OpenAI-compatible extraction backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Base URL of the chat-completions API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Model identifier sent with each request
    #[serde(default = "defaults::model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,

    /// Inline API key, takes precedence over the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Format of the page content handed to the model
    #[serde(default = "defaults::input_format")]
    pub input_format: String,

    /// Page content is truncated to this many characters
    #[serde(default = "defaults::max_content_chars")]
    pub max_content_chars: usize,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            model: defaults::model(),
            api_key_env: defaults::api_key_env(),
            api_key: None,
            input_format: defaults::input_format(),
            max_content_chars: defaults::max_content_chars(),
            temperature: 0.0,
        }
    }
}

impl ExtractionConfig {
    /// Resolve the API key from the inline value or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether a credential is available for LLM extraction.
    pub fn is_available(&self) -> bool {
        self.resolve_api_key().is_some()
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pagecrawl/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn session_id() -> String {
        "default_session".into()
    }
    pub fn bypass_cache() -> bool {
        true
    }
    pub fn link_delay() -> u64 {
        1000
    }

    // Pagination defaults
    pub fn max_pages() -> usize {
        10
    }
    pub fn max_links_per_page() -> usize {
        5
    }

    // Extraction defaults
    pub fn base_url() -> String {
        "https://api.groq.com/openai/v1".into()
    }
    pub fn model() -> String {
        "deepseek-r1-distill-llama-70b".into()
    }
    pub fn api_key_env() -> String {
        "GROQ_API_KEY".into()
    }
    pub fn input_format() -> String {
        "markdown".into()
    }
    pub fn max_content_chars() -> usize {
        24_000
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_css_selector() {
        let mut config = Config::default();
        config.crawler.css_selector = Some("[[invalid".to_string());
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        config.crawler.css_selector = Some("[class^='info-container']".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_phrase_list() {
        let mut config = Config::default();
        config.pagination.no_results_phrases = Some(vec![" ".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[crawler]\ncss_selector = \".listing\"\n\n[pagination]\nmax_pages = 3"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.crawler.css_selector.as_deref(), Some(".listing"));
        assert_eq!(config.crawler.session_id, "default_session");
        assert_eq!(config.pagination.max_pages, 3);
        assert_eq!(config.pagination.max_links_per_page, 5);
        assert_eq!(config.extraction.input_format, "markdown");
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.pagination.max_pages, 10);
    }

    #[test]
    fn inline_api_key_makes_extraction_available() {
        let mut extraction = ExtractionConfig {
            api_key_env: "PAGECRAWL_TEST_UNSET_KEY".to_string(),
            ..ExtractionConfig::default()
        };
        assert!(!extraction.is_available());

        extraction.api_key = Some("secret".to_string());
        assert!(extraction.is_available());
        assert_eq!(extraction.resolve_api_key().as_deref(), Some("secret"));
    }
}
