// src/lib.rs

//! pagecrawl Library
//!
//! Paginated crawling with optional LLM structured-data extraction.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;

pub use pipeline::{expand_links, run_pagination};
pub use services::{classify, detect_no_results, validate as validate_extraction};
