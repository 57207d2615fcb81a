//! Article metadata extraction service.
//!
//! Fetches an article page, pulls title/abstract/full-text markers out of
//! it, follows the full-text link to discover a PDF URL and hands that to
//! the downloader. Only the primary page fetch can fail the extraction;
//! everything after it degrades to missing fields.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::{ArticleRecord, Candidate, Config};
use crate::services::{PageSelectors, PdfDownloader, RecordExtractor};
use crate::utils::http::{create_client, fetch_page, fetch_page_with_timeout};
use crate::utils::{resolve_url, sanitize_title};

/// Service extracting metadata from article pages.
pub struct ArticleExtractor {
    client: Client,
    selectors: Arc<PageSelectors>,
    secondary_timeout_secs: u64,
    downloader: PdfDownloader,
    pdf_dir: PathBuf,
}

impl ArticleExtractor {
    /// Create a new extractor from the application configuration.
    pub fn new(config: &Config, selectors: Arc<PageSelectors>) -> Result<Self> {
        Ok(Self {
            client: create_client(&config.fetch.user_agent, config.fetch.timeout_secs)?,
            selectors,
            secondary_timeout_secs: config.fetch.secondary_timeout_secs,
            downloader: PdfDownloader::new(
                &config.fetch.user_agent,
                config.fetch.secondary_timeout_secs,
            )?,
            pdf_dir: PathBuf::from(&config.paths.pdf_dir),
        })
    }

    /// Follow the full-text link and pull the PDF URL out of its metadata.
    async fn fetch_pdf_url(&self, full_text_url: &str) -> Result<Option<String>> {
        let html =
            fetch_page_with_timeout(&self.client, full_text_url, self.secondary_timeout_secs)
                .await?;

        let pdf_url = {
            let document = Html::parse_document(&html);
            scrape_pdf_url(&document, &self.selectors, full_text_url)
        };
        Ok(pdf_url)
    }

    /// Fetch the PDF under a filename derived from the article title.
    async fn download_pdf(&self, pdf_url: &str, title: &str) -> Option<String> {
        let stem = sanitize_title(title);
        if stem.is_empty() {
            log::warn!("title sanitized to nothing, skipping download of {pdf_url}");
            return None;
        }

        let target = self.pdf_dir.join(format!("{stem}.pdf"));
        match self.downloader.download(pdf_url, &target).await {
            Ok(()) => Some(target.to_string_lossy().into_owned()),
            Err(e) => {
                log::warn!("PDF download failed for {pdf_url}: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl RecordExtractor for ArticleExtractor {
    async fn extract(&self, candidate: &Candidate) -> Result<ArticleRecord> {
        let html = fetch_page(&self.client, &candidate.url).await?;

        let scraped = {
            let document = Html::parse_document(&html);
            scrape_article(&document, &self.selectors, &candidate.url)
        };

        let mut record = ArticleRecord {
            url: Some(candidate.url.clone()),
            title: scraped.title,
            abstract_text: scraped.abstract_text,
            full_text_url: scraped.full_text_url,
            pdf_path: None,
        };

        if let Some(full_text_url) = record.full_text_url.clone() {
            match self.fetch_pdf_url(&full_text_url).await {
                Ok(Some(pdf_url)) => {
                    if let Some(title) = record.title.clone() {
                        record.pdf_path = self.download_pdf(&pdf_url, &title).await;
                    }
                }
                Ok(None) => {
                    log::debug!("no PDF metadata on {full_text_url}");
                }
                Err(e) => {
                    // Full-text page failures never fail the primary record.
                    log::warn!("full-text fetch failed for {full_text_url}: {e}");
                }
            }
        }

        Ok(record)
    }
}

/// Fields scraped from one article page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScrapedArticle {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub full_text_url: Option<String>,
}

/// Pull title, abstract and full-text link out of an article document.
pub fn scrape_article(
    document: &Html,
    selectors: &PageSelectors,
    page_url: &str,
) -> ScrapedArticle {
    let base = Url::parse(page_url).ok();

    let full_text_url = document
        .select(&selectors.full_text_link)
        .filter_map(|el| el.value().attr(&selectors.link_attr))
        .map(|href| match &base {
            Some(base) => resolve_url(base, href),
            None => href.to_string(),
        })
        .next();

    ScrapedArticle {
        title: first_text(document, &selectors.title),
        abstract_text: first_text(document, &selectors.abstract_text),
        full_text_url,
    }
}

/// Extract the PDF URL from a full-text page's metadata tag.
pub fn scrape_pdf_url(
    document: &Html,
    selectors: &PageSelectors,
    page_url: &str,
) -> Option<String> {
    let content = document
        .select(&selectors.pdf_meta)
        .filter_map(|el| el.value().attr("content"))
        .next()?;

    match Url::parse(page_url) {
        Ok(base) => Some(resolve_url(&base, content)),
        Err(_) => Some(content.to_string()),
    }
}

/// Whitespace-normalized text of the first element matching `selector`.
fn first_text(document: &Html, selector: &scraper::Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() { None } else { Some(text) }
}
