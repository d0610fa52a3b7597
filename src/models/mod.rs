// src/models/mod.rs

//! Domain models for the crawler.
//!
//! This module contains all data structures used throughout the crate,
//! organized by their primary purpose.

mod config;
mod content;
mod pagination;
mod record;

// Re-export all public types
pub use config::{Config, CrawlerConfig, ExtractionConfig, PaginationConfig};
pub use content::{ContentType, PageContent};
pub use pagination::{PaginationRequest, PaginationResult, StopReason};
pub use record::{DeepLinkRecord, EXTRACTED_FROM_LINKS, ExtractedRecord, RecordFields, has_value};
