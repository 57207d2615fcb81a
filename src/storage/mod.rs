//! Storage abstractions for report persistence.
//!
//! A run produces one human-readable report plus a machine-readable
//! `stats.json`, both written atomically under the output directory.

mod local;
mod report;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::error::Result;
use crate::models::{CitationReport, RunStats};

pub use local::LocalReportStore;
pub use report::render_report;

/// Metadata about a written report.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    /// Path of the report file
    pub report_path: PathBuf,

    /// Entries written, placeholders included
    pub record_count: usize,

    /// Run start time the filename was derived from
    pub timestamp: DateTime<Local>,
}

/// Destination for a finished run.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Write the grouped records and run statistics.
    async fn write_report(
        &self,
        groups: &[CitationReport],
        stats: &RunStats,
    ) -> Result<WriteSummary>;
}
