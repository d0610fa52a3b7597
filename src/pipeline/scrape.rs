// src/pipeline/scrape.rs

//! Single-page fetch, extract, and validate path.
//!
//! Shared by the pagination loop and deep-link expansion so both treat a
//! page the same way.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Config, ContentType, PageContent};
use crate::services::{PageFetcher, RunConfig, classify, schema, validate};

/// Scrapes single pages through a [`PageFetcher`].
#[derive(Clone)]
pub struct PageScraper {
    fetcher: Arc<dyn PageFetcher>,
    run_config: RunConfig,
    extraction_available: bool,
    custom_schema: Option<Value>,
    custom_instruction: Option<String>,
}

impl PageScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            run_config: RunConfig::from_crawler(&config.crawler),
            extraction_available: config.extraction.is_available(),
            custom_schema: None,
            custom_instruction: None,
        }
    }

    /// Use a caller-defined schema and instruction instead of the canonical
    /// ones for every content type.
    pub fn with_custom_schema(mut self, schema: Value, instruction: impl Into<String>) -> Self {
        self.custom_schema = Some(schema);
        self.custom_instruction = Some(instruction.into());
        self
    }

    /// Fail if the underlying fetcher cannot serve requests yet.
    pub async fn ensure_ready(&self) -> Result<()> {
        self.fetcher.ensure_ready().await
    }

    /// Fetch `url` and validate whatever the extraction backend returned.
    ///
    /// Errors only when the fetch itself fails; unusable extraction output
    /// leaves `structured_data` empty.
    pub async fn scrape(
        &self,
        url: &str,
        use_llm: bool,
        content_type: Option<ContentType>,
    ) -> Result<PageContent> {
        let schema_type = content_type.unwrap_or_default();
        let extraction = if !use_llm {
            None
        } else if self.extraction_available {
            Some(schema::select(
                schema_type,
                self.custom_schema.clone(),
                self.custom_instruction.clone(),
            ))
        } else {
            log::warn!("No extraction credential configured. LLM extraction will be skipped.");
            None
        };
        let extracting = extraction.is_some();

        let run_config = RunConfig {
            extraction,
            ..self.run_config.clone()
        };

        let response = self.fetcher.fetch(url, &run_config).await?;
        if !response.success {
            let message = response
                .error_message
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(AppError::fetch(url, message));
        }

        let structured_data = if extracting {
            let records = validate(response.raw_extraction.as_deref(), schema_type);
            if records.is_empty() {
                None
            } else {
                log::info!("LLM extracted {} items", records.len());
                Some(records)
            }
        } else {
            None
        };

        let mut metadata = response.metadata;
        Ok(PageContent {
            url: url.to_string(),
            title: metadata
                .remove("title")
                .unwrap_or_else(|| "No title found".to_string()),
            description: metadata.remove("description").unwrap_or_default(),
            content: response.content,
            content_type: content_type.unwrap_or_else(|| classify(url)),
            structured_data,
        })
    }
}
