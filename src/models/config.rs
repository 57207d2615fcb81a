//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and pacing behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Input/output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// CSS markers for the PubMed pages
    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::debug!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.secondary_timeout_secs == 0 {
            return Err(AppError::validation(
                "fetch.secondary_timeout_secs must be > 0",
            ));
        }
        if self.fetch.max_results == 0 {
            return Err(AppError::validation("fetch.max_results must be > 0"));
        }
        if Url::parse(&self.fetch.base_url).is_err() {
            return Err(AppError::validation("fetch.base_url is not a valid URL"));
        }
        if self.paths.references_file.trim().is_empty() {
            return Err(AppError::validation("paths.references_file is empty"));
        }
        Ok(())
    }
}

/// HTTP client and request pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Timeout for the full-text follow-up fetch in seconds
    #[serde(default = "defaults::secondary_timeout")]
    pub secondary_timeout_secs: u64,

    /// Pause after each processed unit in milliseconds
    #[serde(default = "defaults::pause")]
    pub pause_ms: u64,

    /// Maximum search result links kept per reference
    #[serde(default = "defaults::max_results")]
    pub max_results: usize,

    /// PubMed base URL
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            secondary_timeout_secs: defaults::secondary_timeout(),
            pause_ms: defaults::pause(),
            max_results: defaults::max_results(),
            base_url: defaults::base_url(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// File holding the blank-line-separated references
    #[serde(default = "defaults::references_file")]
    pub references_file: String,

    /// Directory for the run reports
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    /// Directory for downloaded PDFs
    #[serde(default = "defaults::pdf_dir")]
    pub pdf_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            references_file: defaults::references_file(),
            output_dir: defaults::output_dir(),
            pdf_dir: defaults::pdf_dir(),
        }
    }
}

/// CSS markers for the search result and article pages.
///
/// PubMed markup changes without notice; keeping the selectors in
/// configuration lets a run be repaired without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Result link anchors on the search page
    #[serde(default = "defaults::result_link")]
    pub result_link: String,

    /// Banner shown when the search was silently redirected
    #[serde(default = "defaults::info_banner")]
    pub info_banner: String,

    /// Marker present when the query landed on an article page
    #[serde(default = "defaults::article_page")]
    pub article_page: String,

    /// Article title heading
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Selected abstract block
    #[serde(default = "defaults::abstract_text")]
    pub abstract_text: String,

    /// PMC full-text link anchor
    #[serde(default = "defaults::full_text_link")]
    pub full_text_link: String,

    /// Metadata tag carrying the PDF URL on the full-text page
    #[serde(default = "defaults::pdf_meta")]
    pub pdf_meta: String,

    /// HTML attribute holding link targets
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            result_link: defaults::result_link(),
            info_banner: defaults::info_banner(),
            article_page: defaults::article_page(),
            title: defaults::title(),
            abstract_text: defaults::abstract_text(),
            full_text_link: defaults::full_text_link(),
            pdf_meta: defaults::pdf_meta(),
            link_attr: defaults::link_attr(),
        }
    }
}

mod defaults {
    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn secondary_timeout() -> u64 {
        30
    }
    pub fn pause() -> u64 {
        100
    }
    pub fn max_results() -> usize {
        5
    }
    pub fn base_url() -> String {
        "https://pubmed.ncbi.nlm.nih.gov/".into()
    }

    // Path defaults
    pub fn references_file() -> String {
        "references.txt".into()
    }
    pub fn output_dir() -> String {
        "papers".into()
    }
    pub fn pdf_dir() -> String {
        "full_text".into()
    }

    // Selector defaults
    pub fn result_link() -> String {
        "a.docsum-title".into()
    }
    pub fn info_banner() -> String {
        ".usa-alert--info".into()
    }
    pub fn article_page() -> String {
        "main.article-details".into()
    }
    pub fn title() -> String {
        "h1.heading-title".into()
    }
    pub fn abstract_text() -> String {
        "div.abstract-content.selected".into()
    }
    pub fn full_text_link() -> String {
        "a.link-item.pmc".into()
    }
    pub fn pdf_meta() -> String {
        "meta[name=\"citation_pdf_url\"]".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
}
