//! Utility functions and helpers.

pub mod http;
pub mod url;

pub use url::{is_http_url, page_url};
