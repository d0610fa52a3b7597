// src/testing.rs

//! Scripted [`PageFetcher`] used by the pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::{FetchResponse, PageFetcher, RunConfig};

/// What the fetcher answers for a URL.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Successful fetch; the payload is only returned when extraction was requested
    Page {
        content: String,
        raw_extraction: Option<String>,
    },
    /// Fetch completed but reported failure
    Failure(String),
    /// Fetch raised an error
    Error(String),
}

/// A fetcher answering from a fixed script and recording every call.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Scripted>,
    fallback: Option<Scripted>,
    not_ready: bool,
    calls: Mutex<Vec<(String, RunConfig)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, content: &str, raw_extraction: Option<&str>) -> Self {
        self.pages.insert(
            url.to_string(),
            Scripted::Page {
                content: content.to_string(),
                raw_extraction: raw_extraction.map(str::to_string),
            },
        );
        self
    }

    pub fn failure(mut self, url: &str) -> Self {
        self.pages
            .insert(url.to_string(), Scripted::Failure("HTTP 404 Not Found".to_string()));
        self
    }

    pub fn error(mut self, url: &str) -> Self {
        self.pages
            .insert(url.to_string(), Scripted::Error("connection reset".to_string()));
        self
    }

    /// Answer for URLs without their own script entry.
    pub fn otherwise(mut self, content: &str, raw_extraction: Option<&str>) -> Self {
        self.fallback = Some(Scripted::Page {
            content: content.to_string(),
            raw_extraction: raw_extraction.map(str::to_string),
        });
        self
    }

    pub fn not_ready(mut self) -> Self {
        self.not_ready = true;
        self
    }

    /// URLs fetched so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Run settings of every call, in order.
    pub fn configs(&self) -> Vec<RunConfig> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, config)| config.clone())
            .collect()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn ensure_ready(&self) -> Result<()> {
        if self.not_ready {
            return Err(AppError::not_ready("browser session not started"));
        }
        Ok(())
    }

    async fn fetch(&self, url: &str, config: &RunConfig) -> Result<FetchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), config.clone()));

        let scripted = self
            .pages
            .get(url)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| AppError::fetch(url, "not scripted"))?;

        match scripted {
            Scripted::Page {
                content,
                raw_extraction,
            } => {
                let mut metadata = HashMap::new();
                metadata.insert("title".to_string(), format!("Title of {url}"));
                Ok(FetchResponse {
                    success: true,
                    content,
                    metadata,
                    raw_extraction: config.extraction.as_ref().and(raw_extraction),
                    error_message: None,
                })
            }
            Scripted::Failure(message) => Ok(FetchResponse::failure(message)),
            Scripted::Error(message) => Err(AppError::fetch(url, message)),
        }
    }
}

/// Configuration with an inline credential and no pacing delay.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.extraction.api_key = Some("test-key".to_string());
    config.crawler.link_delay_ms = 0;
    config
}
