//! Compiled CSS selectors for the PubMed pages.

use scraper::Selector;

use crate::error::{AppError, Result};
use crate::models::SelectorConfig;

/// Selectors compiled once at startup from [`SelectorConfig`].
///
/// A selector that fails to parse is a fatal configuration error; nothing
/// downstream can run without a usable marker set.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub result_link: Selector,
    pub info_banner: Selector,
    pub article_page: Selector,
    pub title: Selector,
    pub abstract_text: Selector,
    pub full_text_link: Selector,
    pub pdf_meta: Selector,
    pub link_attr: String,
}

impl PageSelectors {
    /// Compile all configured selectors.
    pub fn compile(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            result_link: parse_selector(&config.result_link)?,
            info_banner: parse_selector(&config.info_banner)?,
            article_page: parse_selector(&config.article_page)?,
            title: parse_selector(&config.title)?,
            abstract_text: parse_selector(&config.abstract_text)?,
            full_text_link: parse_selector(&config.full_text_link)?,
            pdf_meta: parse_selector(&config.pdf_meta)?,
            link_attr: config.link_attr.clone(),
        })
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        assert!(PageSelectors::compile(&SelectorConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let mut config = SelectorConfig::default();
        config.title = "[[invalid".to_string();
        assert!(PageSelectors::compile(&config).is_err());
    }
}
