//! Service layer for the fetcher application.
//!
//! This module contains the business logic for:
//! - Reference search (`PubmedSearcher`)
//! - Article metadata extraction (`ArticleExtractor`)
//! - PDF download (`PdfDownloader`)
//! - Page marker compilation (`PageSelectors`)

mod download;
mod extract;
mod search;
mod selectors;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ArticleRecord, Candidate, Citation};

pub use download::PdfDownloader;
pub use extract::ArticleExtractor;
pub use search::PubmedSearcher;
pub use selectors::PageSelectors;

/// Resolves one citation to candidate article URLs.
#[async_trait]
pub trait CitationSearcher: Send + Sync {
    async fn search(&self, citation: &Citation) -> Result<Vec<Candidate>>;
}

/// Turns one candidate URL into an extracted article record.
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    async fn extract(&self, candidate: &Candidate) -> Result<ArticleRecord>;
}
