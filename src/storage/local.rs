//! Local filesystem report store.
//!
//! Writes `papers_<YYYYMMDD_HHMMSS>.txt` and `stats.json` under the
//! output directory, creating it when absent. All writes go through a
//! temp file and a rename so a crash never leaves a half-written report.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{CitationReport, RunStats};
use crate::storage::{ReportStore, WriteSummary, render_report};

/// Report store rooted at the output directory.
#[derive(Debug, Clone)]
pub struct LocalReportStore {
    output_dir: PathBuf,
}

impl LocalReportStore {
    /// Create a new store rooted at the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(name);
        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }
}

#[async_trait]
impl ReportStore for LocalReportStore {
    async fn write_report(
        &self,
        groups: &[CitationReport],
        stats: &RunStats,
    ) -> Result<WriteSummary> {
        let timestamp = stats.started_at;
        let name = format!("papers_{}.txt", timestamp.format("%Y%m%d_%H%M%S"));

        let rendered = render_report(groups);
        let report_path = self.write_bytes(&name, rendered.as_bytes()).await?;

        let stats_bytes = serde_json::to_vec_pretty(stats)?;
        self.write_bytes("stats.json", &stats_bytes).await?;

        Ok(WriteSummary {
            report_path,
            record_count: groups.iter().map(|g| g.records.len()).sum(),
            timestamp,
        })
    }
}
