// src/error.rs

//! Unified error handling for the crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Page could not be fetched or the fetcher reported failure
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// LLM extraction backend failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Fetcher was used before it was ready
    #[error("Fetcher not ready: {0}")]
    NotReady(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction backend error.
    pub fn extraction(message: impl fmt::Display) -> Self {
        Self::Extraction(message.to_string())
    }

    /// Create a not-ready error.
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = AppError::fetch("https://x.com/list?page=2", "HTTP 503");
        assert_eq!(
            err.to_string(),
            "Fetch failed for https://x.com/list?page=2: HTTP 503"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = AppError::config("crawler.css_selector is not a valid selector");
        assert_eq!(
            err.to_string(),
            "Configuration error: crawler.css_selector is not a valid selector"
        );
    }

    #[test]
    fn test_selector_error_display() {
        let err = AppError::selector("[[bad", "unexpected token");
        assert_eq!(err.to_string(), "Invalid selector '[[bad': unexpected token");
    }
}
