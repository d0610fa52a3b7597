//! URL-based content type classification.

use url::Url;

use crate::models::ContentType;

/// Path segments that identify a content type.
const SEGMENT_MARKERS: &[(&str, ContentType)] = &[
    ("product", ContentType::Product),
    ("article", ContentType::Article),
];

/// Guess the content type of a page from its URL path.
///
/// Coarse by nature: only a path segment equal to a known marker counts, so
/// `/product/42` is a product page but `/products-overview` is not. Callers
/// wanting precision pass an explicit [`ContentType`] instead.
pub fn classify(url: &str) -> ContentType {
    let segments: Vec<String> = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .map(|segs| segs.map(str::to_lowercase).collect())
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .split('/')
            .map(str::to_lowercase)
            .collect(),
    };

    segments
        .iter()
        .find_map(|segment| {
            SEGMENT_MARKERS
                .iter()
                .find(|(marker, _)| segment == marker)
                .map(|(_, tag)| *tag)
        })
        .unwrap_or(ContentType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markers() {
        assert_eq!(classify("https://shop.com/product/42"), ContentType::Product);
        assert_eq!(classify("https://news.com/Article/today"), ContentType::Article);
    }

    #[test]
    fn test_classify_requires_whole_segment() {
        assert_eq!(classify("https://shop.com/products-overview"), ContentType::Unknown);
        assert_eq!(classify("https://shop.com/?q=product"), ContentType::Unknown);
    }

    #[test]
    fn test_classify_unparseable_url() {
        assert_eq!(classify("shop/product/1"), ContentType::Product);
        assert_eq!(classify(""), ContentType::Unknown);
    }
}
