//! PubMed search service.
//!
//! Resolves a free-text reference to candidate article URLs via the
//! search endpoint, applying the result-page disambiguation rules.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::{Candidate, Citation, Config};
use crate::services::{CitationSearcher, PageSelectors};
use crate::utils::http::{create_client, fetch_page};
use crate::utils::resolve_url;

/// Service resolving citations against the PubMed search page.
pub struct PubmedSearcher {
    client: Client,
    selectors: Arc<PageSelectors>,
    base_url: Url,
    max_results: usize,
}

impl PubmedSearcher {
    /// Create a new searcher from the application configuration.
    pub fn new(config: &Config, selectors: Arc<PageSelectors>) -> Result<Self> {
        Ok(Self {
            client: create_client(&config.fetch.user_agent, config.fetch.timeout_secs)?,
            selectors,
            base_url: Url::parse(&config.fetch.base_url)?,
            max_results: config.fetch.max_results,
        })
    }

    /// Build the search URL with the citation as a percent-encoded term.
    fn search_url(&self, citation: &Citation) -> Result<Url> {
        Ok(Url::parse_with_params(
            self.base_url.as_str(),
            &[("term", citation.text.as_str())],
        )?)
    }
}

#[async_trait]
impl CitationSearcher for PubmedSearcher {
    async fn search(&self, citation: &Citation) -> Result<Vec<Candidate>> {
        let search_url = self.search_url(citation)?;
        let html = fetch_page(&self.client, search_url.as_str()).await?;

        let candidates = {
            let document = Html::parse_document(&html);
            select_candidates(
                &document,
                &search_url,
                &self.base_url,
                &self.selectors,
                self.max_results,
            )
        };

        log::debug!(
            "search '{}' resolved to {} candidate(s)",
            citation.text,
            candidates.len()
        );
        Ok(candidates)
    }
}

/// Apply the result-page disambiguation rules, in order:
///
/// 1. informational banner plus at least one result link: the engine
///    silently redirected to an approximate single match, keep only the
///    first link;
/// 2. article-page marker: the query landed directly on an article page,
///    the search URL itself is the sole candidate;
/// 3. otherwise up to `cap` result links in page order.
pub fn select_candidates(
    document: &Html,
    search_url: &Url,
    base: &Url,
    selectors: &PageSelectors,
    cap: usize,
) -> Vec<Candidate> {
    let links: Vec<String> = document
        .select(&selectors.result_link)
        .filter_map(|el| el.value().attr(&selectors.link_attr))
        .map(|href| resolve_url(base, href))
        .collect();

    if document.select(&selectors.info_banner).next().is_some() && !links.is_empty() {
        return vec![Candidate {
            ordinal: 1,
            url: links[0].clone(),
        }];
    }

    if document.select(&selectors.article_page).next().is_some() {
        return vec![Candidate {
            ordinal: 1,
            url: search_url.to_string(),
        }];
    }

    links
        .into_iter()
        .take(cap)
        .enumerate()
        .map(|(i, url)| Candidate {
            ordinal: i + 1,
            url,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectorConfig;

    fn selectors() -> PageSelectors {
        PageSelectors::compile(&SelectorConfig::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://pubmed.ncbi.nlm.nih.gov/").unwrap()
    }

    fn search_url() -> Url {
        Url::parse("https://pubmed.ncbi.nlm.nih.gov/?term=smith+2020").unwrap()
    }

    fn result_links(n: usize) -> String {
        (1..=n)
            .map(|i| format!(r#"<a class="docsum-title" href="/{i}/">Result {i}</a>"#))
            .collect()
    }

    #[test]
    fn test_plain_results_are_capped() {
        let html = format!("<html><body>{}</body></html>", result_links(7));
        let document = Html::parse_document(&html);

        let candidates = select_candidates(&document, &search_url(), &base(), &selectors(), 5);

        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0].url, "https://pubmed.ncbi.nlm.nih.gov/1/");
        assert_eq!(candidates[4].url, "https://pubmed.ncbi.nlm.nih.gov/5/");
        assert_eq!(candidates[4].ordinal, 5);
    }

    #[test]
    fn test_info_banner_keeps_first_link_only() {
        let html = format!(
            r#"<html><body><div class="usa-alert--info">Showing results for a similar term</div>{}</body></html>"#,
            result_links(3)
        );
        let document = Html::parse_document(&html);

        let candidates = select_candidates(&document, &search_url(), &base(), &selectors(), 5);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://pubmed.ncbi.nlm.nih.gov/1/");
    }

    #[test]
    fn test_article_page_marker_returns_search_url() {
        let html = r#"<html><body><main class="article-details">
            <h1 class="heading-title">Some article</h1>
        </main></body></html>"#;
        let document = Html::parse_document(html);

        let candidates = select_candidates(&document, &search_url(), &base(), &selectors(), 5);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, search_url().to_string());
    }

    #[test]
    fn test_no_markers_no_links_is_empty() {
        let document = Html::parse_document("<html><body><p>No results.</p></body></html>");

        let candidates = select_candidates(&document, &search_url(), &base(), &selectors(), 5);

        assert!(candidates.is_empty());
    }

    #[test]
    fn test_banner_without_links_falls_through_to_empty() {
        let html = r#"<html><body><div class="usa-alert--info">note</div></body></html>"#;
        let document = Html::parse_document(html);

        let candidates = select_candidates(&document, &search_url(), &base(), &selectors(), 5);

        assert!(candidates.is_empty());
    }
}
