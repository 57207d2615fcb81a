//! Reference and article data structures.

use serde::{Deserialize, Serialize};

/// One free-text bibliographic reference to search for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    /// Trimmed reference text, exactly as it appeared between blank lines
    pub text: String,
}

impl Citation {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A search result URL believed to correspond to a citation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    /// 1-based position within the citation's result group
    pub ordinal: usize,

    /// Resolved article page URL
    pub url: String,
}

/// Metadata extracted from one article page.
///
/// Any field may be absent; an extraction miss is not a failure. The
/// all-`None` form stands in for a citation that matched nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Article page URL (absent for placeholder entries)
    pub url: Option<String>,

    /// Article title
    pub title: Option<String>,

    /// Abstract text
    pub abstract_text: Option<String>,

    /// PMC full-text page URL
    pub full_text_url: Option<String>,

    /// Local path of the downloaded PDF, when one was fetched
    pub pdf_path: Option<String>,
}

impl ArticleRecord {
    /// Placeholder entry for a citation with zero candidates.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Entry for a candidate whose page could not be fetched.
    pub fn unreachable(candidate: &Candidate) -> Self {
        Self {
            url: Some(candidate.url.clone()),
            ..Self::default()
        }
    }
}

/// All records gathered for one citation, in site-presented order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationReport {
    pub citation: Citation,
    pub records: Vec<ArticleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_no_fields() {
        let record = ArticleRecord::placeholder();
        assert!(record.url.is_none());
        assert!(record.title.is_none());
        assert!(record.abstract_text.is_none());
        assert!(record.full_text_url.is_none());
    }

    #[test]
    fn unreachable_keeps_the_url() {
        let candidate = Candidate {
            ordinal: 1,
            url: "https://pubmed.ncbi.nlm.nih.gov/12345678/".to_string(),
        };
        let record = ArticleRecord::unreachable(&candidate);
        assert_eq!(record.url.as_deref(), Some(candidate.url.as_str()));
        assert!(record.title.is_none());
    }
}
