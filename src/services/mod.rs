//! Service layer for the crawler.
//!
//! This module contains the decision logic used by the pipeline:
//! - Content type classification (`classify`)
//! - Extraction schema selection (`schema::select`)
//! - Extraction output validation (`validate`)
//! - "No results" detection (`NoResultsDetector`)
//! - Page fetching (`PageFetcher`, `HttpFetcher`) and the LLM backend (`LlmExtractor`)

mod classifier;
pub mod fetcher;
pub mod llm;
mod no_results;
pub mod schema;
mod validator;

pub use classifier::classify;
pub use fetcher::{FetchResponse, HttpFetcher, PageFetcher, RunConfig};
pub use llm::LlmExtractor;
pub use no_results::{DEFAULT_PHRASES, NoResultsDetector, detect_no_results};
pub use schema::ExtractionSchema;
pub use validator::validate;
