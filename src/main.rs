// src/main.rs

//! pubfetch: PubMed Reference Fetcher CLI
//!
//! Reads blank-line-separated references, resolves each against PubMed,
//! extracts article metadata, downloads open-access PDFs and writes a
//! grouped report.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use pubfetch::error::Result;
use pubfetch::models::Config;
use pubfetch::pipeline::{LogProgress, run_pipeline};
use pubfetch::services::{ArticleExtractor, PageSelectors, PubmedSearcher};
use pubfetch::storage::LocalReportStore;

#[derive(Parser, Debug)]
#[command(
    name = "pubfetch",
    version = "0.1.0",
    about = "PubMed Reference Fetcher"
)]

/// CLI Arguments
struct Cli {
    #[arg(short, long, default_value = "pubfetch.toml")]
    config: String,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve references and write the report
    Run {
        /// References file (blank-line-separated entries)
        #[arg(long)]
        references: Option<String>,
        /// Report output directory
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate configuration
    Validate,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Run { references, output } => {
            if let Some(path) = references {
                config.paths.references_file = path;
            }
            if let Some(dir) = output {
                config.paths.output_dir = dir;
            }
            config.validate()?;
            run(config).await?;
        }
        Command::Validate => run_validate(&config)?,
    }

    Ok(())
}

/// Run the pipeline on its own task, leaving the caller's loop free.
async fn run(config: Config) -> Result<()> {
    let handle = tokio::spawn(async move {
        let selectors = Arc::new(PageSelectors::compile(&config.selectors)?);
        let searcher = PubmedSearcher::new(&config, Arc::clone(&selectors))?;
        let extractor = ArticleExtractor::new(&config, selectors)?;
        let store = LocalReportStore::new(&config.paths.output_dir);
        let sink = LogProgress;

        run_pipeline(&config, &searcher, &extractor, &store, &sink).await
    });

    handle.await.expect("pipeline task panicked")?;
    Ok(())
}

/// Validate configuration and print the effective settings.
fn run_validate(config: &Config) -> Result<()> {
    config.validate()?;
    PageSelectors::compile(&config.selectors)?;

    log::info!("configuration OK");
    log::info!("    user agent: {}", config.fetch.user_agent);
    log::info!("    timeout: {}s", config.fetch.timeout_secs);
    log::info!("    max results: {}", config.fetch.max_results);
    log::info!("    references: {}", config.paths.references_file);
    log::info!("    output dir: {}", config.paths.output_dir);
    log::info!("    pdf dir: {}", config.paths.pdf_dir);
    Ok(())
}
