//! "No more results" detection for paginated listings.
//!
//! A plain case-insensitive phrase search. It has no notion of language or
//! context, so a page mentioning "no results" in unrelated prose is treated
//! as exhausted, and an empty listing worded differently is not noticed.

/// Phrases that indicate an exhausted listing.
pub const DEFAULT_PHRASES: &[&str] = &[
    "no results found",
    "no results",
    "nothing found",
    "0 results",
    "no matches",
    "no items found",
    "empty results",
    "no data available",
];

/// Detects pages announcing that a listing has run out of results.
#[derive(Debug, Clone)]
pub struct NoResultsDetector {
    phrases: Vec<String>,
}

impl NoResultsDetector {
    /// Create a detector with a custom phrase list, replacing the defaults.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Detector for an optional configured list, defaults when absent.
    pub fn from_config(phrases: Option<&[String]>) -> Self {
        match phrases {
            Some(custom) => Self::new(custom),
            None => Self::default(),
        }
    }

    /// Whether `content` contains one of the phrases.
    pub fn detect(&self, content: &str) -> bool {
        if content.is_empty() {
            return false;
        }
        let lowered = content.to_lowercase();
        self.phrases.iter().any(|phrase| lowered.contains(phrase))
    }
}

impl Default for NoResultsDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASES)
    }
}

/// Check `content` against the default phrase list.
pub fn detect_no_results(content: &str) -> bool {
    NoResultsDetector::default().detect(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_case_insensitively() {
        assert!(detect_no_results("<p>No Results Found for 'shoes'</p>"));
        assert!(detect_no_results("Showing 0 RESULTS"));
    }

    #[test]
    fn test_empty_content_is_not_a_match() {
        assert!(!detect_no_results(""));
    }

    #[test]
    fn test_regular_listing_passes() {
        assert!(!detect_no_results("Page 2 of 5: Widget, Gadget, Gizmo"));
    }

    #[test]
    fn test_custom_list_replaces_defaults() {
        let detector = NoResultsDetector::new(["Keine Ergebnisse"]);
        assert!(detector.detect("keine ergebnisse gefunden"));
        assert!(!detector.detect("No results found"));
    }

    #[test]
    fn test_prose_mention_is_a_known_false_positive() {
        assert!(detect_no_results("Tips for when a search returns no matches"));
    }
}
