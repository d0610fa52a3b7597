// src/utils/url.rs

//! URL manipulation utilities.

/// Build the URL of page `page_number` of a paginated listing.
///
/// # Examples
/// ```
/// use pagecrawl::utils::url::page_url;
///
/// assert_eq!(page_url("https://x.com/list", 2), "https://x.com/list?page=2");
/// assert_eq!(page_url("https://x.com/list?cat=a", 3), "https://x.com/list?cat=a&page=3");
/// ```
pub fn page_url(base: &str, page_number: usize) -> String {
    if base.contains('?') {
        format!("{base}&page={page_number}")
    } else {
        format!("{base}?page={page_number}")
    }
}

/// Whether `link` is an absolute http(s) URL.
pub fn is_http_url(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}
