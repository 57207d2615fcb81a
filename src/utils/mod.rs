//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Derive a filesystem-safe filename stem from an article title.
///
/// Keeps alphanumerics, spaces, underscores and hyphens, collapses
/// whitespace runs to a single underscore and truncates to 100 characters.
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(100)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://pubmed.ncbi.nlm.nih.gov/").unwrap();
        assert_eq!(
            resolve_url(&base, "/38740312/"),
            "https://pubmed.ncbi.nlm.nih.gov/38740312/"
        );
        assert_eq!(
            resolve_url(&base, "https://pmc.ncbi.nlm.nih.gov/articles/PMC11012345/"),
            "https://pmc.ncbi.nlm.nih.gov/articles/PMC11012345/"
        );
    }

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize_title("A/B: Test*Name"), "AB_TestName");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_title("  spaced   out\ttitle "), "spaced_out_title");
    }

    #[test]
    fn test_sanitize_keeps_hyphens_and_underscores() {
        assert_eq!(sanitize_title("COVID-19_update"), "COVID-19_update");
    }

    #[test]
    fn test_sanitize_truncates_to_100_chars() {
        let long = "x".repeat(250);
        assert_eq!(sanitize_title(&long).chars().count(), 100);
    }
}
