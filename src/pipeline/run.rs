// src/pipeline/run.rs

//! Pipeline orchestration.
//!
//! Two phases over the citation sequence: a sizing phase that materializes
//! every (citation, candidates) pair so the progress denominator is fixed
//! before any unit completes, then an extraction phase that emits exactly
//! one record per unit. Searches run once; the sizing phase reuses its
//! results instead of re-querying.

use std::path::Path;
use std::time::Duration;

use chrono::Local;

use crate::error::Result;
use crate::models::{ArticleRecord, Candidate, Citation, CitationReport, Config, RunStats};
use crate::pipeline::progress::{ProgressSink, ProgressState, RunSummary};
use crate::pipeline::references::read_references;
use crate::services::{CitationSearcher, RecordExtractor};
use crate::storage::ReportStore;

/// Run the full scrape pipeline.
pub async fn run_pipeline(
    config: &Config,
    searcher: &dyn CitationSearcher,
    extractor: &dyn RecordExtractor,
    store: &dyn ReportStore,
    sink: &dyn ProgressSink,
) -> Result<RunSummary> {
    let started_at = Local::now();

    let citations = read_references(Path::new(&config.paths.references_file)).await?;
    log::info!(
        "loaded {} reference(s) from {}",
        citations.len(),
        config.paths.references_file
    );

    // Sizing phase: one search per citation, results kept for extraction.
    let mut search_failures = 0;
    let mut groups: Vec<(Citation, Vec<Candidate>)> = Vec::with_capacity(citations.len());
    for citation in citations {
        let candidates = match searcher.search(&citation).await {
            Ok(candidates) => candidates,
            Err(e) => {
                search_failures += 1;
                log::warn!("search failed for '{}': {}", citation.text, e);
                Vec::new()
            }
        };
        groups.push((citation, candidates));
    }

    let candidate_count: usize = groups.iter().map(|(_, c)| c.len()).sum();
    let total_units: usize = groups.iter().map(|(_, c)| c.len().max(1)).sum();

    if total_units == 0 {
        log::info!("no references to process");
        let summary = RunSummary {
            report_path: None,
            stats: stats_for(started_at, &[], candidate_count, search_failures, 0),
        };
        sink.on_complete(&summary);
        return Ok(summary);
    }

    log::info!(
        "processing {} unit(s) across {} reference(s)",
        total_units,
        groups.len()
    );

    // Extraction phase: strict citation-then-candidate order; report layout
    // and progress accounting both depend on it.
    let mut progress = ProgressState::new(total_units);
    let pause = Duration::from_millis(config.fetch.pause_ms);
    let mut extract_failures = 0;
    let mut reports: Vec<CitationReport> = Vec::with_capacity(groups.len());

    for (index, (citation, candidates)) in groups.into_iter().enumerate() {
        log::info!("reference {}: {}", index + 1, citation.text);

        let mut records = Vec::with_capacity(candidates.len().max(1));
        if candidates.is_empty() {
            log::info!("no matching articles for reference {}", index + 1);
            records.push(ArticleRecord::placeholder());
            sink.on_progress(progress.advance());
            pace(pause).await;
        } else {
            for candidate in &candidates {
                log::debug!(
                    "article {}.{}: {}",
                    index + 1,
                    candidate.ordinal,
                    candidate.url
                );
                let record = match extractor.extract(candidate).await {
                    Ok(record) => record,
                    Err(e) => {
                        extract_failures += 1;
                        log::warn!("article fetch failed for {}: {}", candidate.url, e);
                        ArticleRecord::unreachable(candidate)
                    }
                };
                records.push(record);
                sink.on_progress(progress.advance());
                pace(pause).await;
            }
        }

        reports.push(CitationReport { citation, records });
    }

    let stats = stats_for(
        started_at,
        &reports,
        candidate_count,
        search_failures,
        extract_failures,
    );
    let written = store.write_report(&reports, &stats).await?;
    log::info!(
        "report with {} entries written to {}",
        written.record_count,
        written.report_path.display()
    );

    let summary = RunSummary {
        report_path: Some(written.report_path),
        stats,
    };
    sink.on_complete(&summary);
    Ok(summary)
}

/// Brief cooperative pause between units, purely for sink cadence.
async fn pace(pause: Duration) {
    if !pause.is_zero() {
        tokio::time::sleep(pause).await;
    }
}

fn stats_for(
    started_at: chrono::DateTime<Local>,
    reports: &[CitationReport],
    candidate_count: usize,
    search_failures: usize,
    extract_failures: usize,
) -> RunStats {
    RunStats {
        started_at,
        finished_at: Local::now(),
        citation_count: reports.len(),
        candidate_count,
        record_count: reports.iter().map(|g| g.records.len()).sum(),
        placeholder_count: reports
            .iter()
            .filter(|g| g.records.iter().any(|r| r.url.is_none()))
            .count(),
        pdf_downloads: reports
            .iter()
            .flat_map(|g| g.records.iter())
            .filter(|r| r.pdf_path.is_some())
            .count(),
        search_failures,
        extract_failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::WriteSummary;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    struct StubSearcher {
        counts: HashMap<String, usize>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl CitationSearcher for StubSearcher {
        async fn search(&self, citation: &Citation) -> Result<Vec<Candidate>> {
            if self.failing.contains(&citation.text) {
                return Err(AppError::validation("stub transport failure"));
            }
            let count = self.counts.get(&citation.text).copied().unwrap_or(0);
            Ok((1..=count)
                .map(|ordinal| Candidate {
                    ordinal,
                    url: format!("https://pubmed.test/{}/{}/", citation.text, ordinal),
                })
                .collect())
        }
    }

    struct StubExtractor {
        failing: bool,
    }

    #[async_trait]
    impl RecordExtractor for StubExtractor {
        async fn extract(&self, candidate: &Candidate) -> Result<ArticleRecord> {
            if self.failing {
                return Err(AppError::validation("stub fetch failure"));
            }
            Ok(ArticleRecord {
                url: Some(candidate.url.clone()),
                title: Some(format!("Title {}", candidate.ordinal)),
                abstract_text: None,
                full_text_url: None,
                pdf_path: None,
            })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        written: Mutex<Vec<CitationReport>>,
    }

    #[async_trait]
    impl ReportStore for MemoryStore {
        async fn write_report(
            &self,
            groups: &[CitationReport],
            stats: &RunStats,
        ) -> Result<WriteSummary> {
            *self.written.lock().unwrap() = groups.to_vec();
            Ok(WriteSummary {
                report_path: "papers/papers_test.txt".into(),
                record_count: stats.record_count,
                timestamp: stats.started_at,
            })
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        updates: Mutex<Vec<f64>>,
        completed: AtomicBool,
    }

    impl ProgressSink for CollectingSink {
        fn on_progress(&self, percent: f64) {
            self.updates.lock().unwrap().push(percent);
        }

        fn on_complete(&self, _summary: &RunSummary) {
            self.completed.store(true, Ordering::SeqCst);
        }
    }

    async fn config_with_references(tmp: &TempDir, content: &str) -> Config {
        let path = tmp.path().join("references.txt");
        tokio::fs::write(&path, content).await.unwrap();

        let mut config = Config::default();
        config.paths.references_file = path.to_string_lossy().into_owned();
        config.fetch.pause_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_round_trip_totals_and_layout() {
        let tmp = TempDir::new().unwrap();
        let config =
            config_with_references(&tmp, "Smith et al 2020 cancer\n\nJones 2019 diabetes").await;

        let searcher = StubSearcher {
            counts: HashMap::from([("Smith et al 2020 cancer".to_string(), 3)]),
            failing: Vec::new(),
        };
        let extractor = StubExtractor { failing: false };
        let store = MemoryStore::default();
        let sink = CollectingSink::default();

        let summary = run_pipeline(&config, &searcher, &extractor, &store, &sink)
            .await
            .unwrap();

        // 3 candidates + 1 placeholder = 4 units.
        assert_eq!(summary.stats.record_count, 4);
        assert_eq!(summary.stats.candidate_count, 3);
        assert_eq!(summary.stats.placeholder_count, 1);

        let written = store.written.lock().unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].records.len(), 3);
        assert_eq!(written[1].records.len(), 1);
        assert!(written[1].records[0].url.is_none());

        let updates = sink.updates.lock().unwrap();
        assert_eq!(updates.len(), 4);
        assert!(updates.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*updates.last().unwrap(), 100.0);
        assert!(sink.completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_search_failure_becomes_placeholder() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_references(&tmp, "broken reference").await;

        let searcher = StubSearcher {
            counts: HashMap::new(),
            failing: vec!["broken reference".to_string()],
        };
        let extractor = StubExtractor { failing: false };
        let store = MemoryStore::default();
        let sink = CollectingSink::default();

        let summary = run_pipeline(&config, &searcher, &extractor, &store, &sink)
            .await
            .unwrap();

        assert_eq!(summary.stats.search_failures, 1);
        assert_eq!(summary.stats.record_count, 1);
        assert_eq!(summary.stats.placeholder_count, 1);
    }

    #[tokio::test]
    async fn test_extract_failure_keeps_unit_accounting() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_references(&tmp, "some reference").await;

        let searcher = StubSearcher {
            counts: HashMap::from([("some reference".to_string(), 2)]),
            failing: Vec::new(),
        };
        let extractor = StubExtractor { failing: true };
        let store = MemoryStore::default();
        let sink = CollectingSink::default();

        let summary = run_pipeline(&config, &searcher, &extractor, &store, &sink)
            .await
            .unwrap();

        assert_eq!(summary.stats.extract_failures, 2);
        assert_eq!(summary.stats.record_count, 2);

        // Unreachable candidates still carry their URL in the report.
        let written = store.written.lock().unwrap();
        assert!(written[0].records.iter().all(|r| r.url.is_some()));
        assert!(written[0].records.iter().all(|r| r.title.is_none()));

        let updates = sink.updates.lock().unwrap();
        assert_eq!(*updates.last().unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_empty_input_completes_without_report() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_references(&tmp, "\n\n\n").await;

        let searcher = StubSearcher {
            counts: HashMap::new(),
            failing: Vec::new(),
        };
        let extractor = StubExtractor { failing: false };
        let store = MemoryStore::default();
        let sink = CollectingSink::default();

        let summary = run_pipeline(&config, &searcher, &extractor, &store, &sink)
            .await
            .unwrap();

        assert!(summary.report_path.is_none());
        assert_eq!(summary.stats.record_count, 0);
        assert!(store.written.lock().unwrap().is_empty());
        assert!(sink.updates.lock().unwrap().is_empty());
        assert!(sink.completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_missing_references_file_is_fatal() {
        let mut config = Config::default();
        config.paths.references_file = "/nonexistent/references.txt".to_string();

        let searcher = StubSearcher {
            counts: HashMap::new(),
            failing: Vec::new(),
        };
        let extractor = StubExtractor { failing: false };
        let store = MemoryStore::default();
        let sink = CollectingSink::default();

        let result = run_pipeline(&config, &searcher, &extractor, &store, &sink).await;
        assert!(result.is_err());
    }
}
