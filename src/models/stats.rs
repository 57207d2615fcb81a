//! Run statistics.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Counters describing one completed run, written to `stats.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,

    /// References read from the input file
    pub citation_count: usize,

    /// Candidate article URLs across all references
    pub candidate_count: usize,

    /// Report entries written, placeholders included
    pub record_count: usize,

    /// References that matched nothing
    pub placeholder_count: usize,

    /// PDFs fetched to disk
    pub pdf_downloads: usize,

    /// Searches that failed with a transport or status error
    pub search_failures: usize,

    /// Article pages that could not be fetched
    pub extract_failures: usize,
}
