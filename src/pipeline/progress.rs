// src/pipeline/progress.rs

//! Progress accounting and the sink consumed by external observers.

use std::path::PathBuf;

use crate::models::RunStats;

/// Deterministic completion accounting for one run.
///
/// The denominator is fixed before any progress is reported: every
/// citation contributes its candidate count, or one unit when it matched
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    completed: usize,
    total: usize,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Record one finished unit and return the new percentage.
    pub fn advance(&mut self) -> f64 {
        self.completed = (self.completed + 1).min(self.total);
        self.percent()
    }

    /// Completion percentage in `[0, 100]`. A zero total counts as done.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Outcome of a completed run, handed to the sink and the caller.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Written report, absent when there was nothing to process
    pub report_path: Option<PathBuf>,
    pub stats: RunStats,
}

/// Consumer of progress updates from the pipeline.
///
/// The pipeline only ever pushes values through this trait; it never
/// learns what renders them.
pub trait ProgressSink: Send + Sync {
    /// Called after every unit of work with the completion percentage.
    fn on_progress(&self, percent: f64);

    /// Called once, after the report has been written.
    fn on_complete(&self, summary: &RunSummary);
}

/// Sink logging progress at info level. Used by the CLI.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&self, percent: f64) {
        log::info!("progress: {percent:.1}%");
    }

    fn on_complete(&self, summary: &RunSummary) {
        match &summary.report_path {
            Some(path) => log::info!("run complete, report at {}", path.display()),
            None => log::info!("run complete, nothing to report"),
        }
    }
}
