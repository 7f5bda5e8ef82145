//! linkwalk main entry point
//!
//! This is the command-line interface for the linkwalk broken-link checker.

use anyhow::Context;
use clap::Parser;
use linkwalk::config::{load_config_with_hash, Config};
use linkwalk::crawler::{build_http_client, event_channel, CrawlEvent, CrawlOptions, Crawler};
use linkwalk::output::{export_csv, print_summary, write_json, CheckSummary};
use linkwalk::{api, CancellationToken, LinkCheckResult, LinkwalkError};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// linkwalk: find broken links on a page or across a whole site
///
/// Fetches the page, extracts every hyperlink and checks that each one
/// resolves. With --recursive, same-site pages are followed breadth-first up to
/// --max-depth. Press Ctrl-C to stop early; results gathered so far are still
/// reported.
#[derive(Parser, Debug)]
#[command(name = "linkwalk")]
#[command(version)]
#[command(about = "Find broken links on a page or a whole site", long_about = None)]
struct Cli {
    /// Page to check
    #[arg(value_name = "URL")]
    url: String,

    /// Follow same-site links and check those pages too
    #[arg(short, long)]
    recursive: bool,

    /// Maximum page depth when recursive (defaults to the configured value)
    #[arg(short = 'd', long, value_name = "N")]
    max_depth: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write results as CSV to this path
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Ask a remote checker endpoint instead of crawling locally
    #[arg(long, value_name = "ENDPOINT", conflicts_with_all = ["recursive", "max_depth"])]
    api: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Everything gathered from a run, complete or not
struct Outcome {
    results: Vec<LinkCheckResult>,
    pages_checked: usize,
    page_errors: Vec<linkwalk::crawler::PageError>,
    cancelled: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let token = CancellationToken::new();
    spawn_interrupt_handler(token.clone());

    let outcome = match &cli.api {
        Some(endpoint) => handle_remote(&config, endpoint, &cli.url, &token).await?,
        None => handle_crawl(config, &cli, &token).await?,
    };

    if let Some(path) = &cli.csv {
        export_csv(&outcome.results, path)?;
    }

    let mut summary =
        CheckSummary::from_results(&outcome.results, outcome.pages_checked, &outcome.page_errors);
    if outcome.cancelled {
        summary = summary.cancelled();
    }

    if cli.json {
        let report = linkwalk::CrawlReport {
            results: outcome.results,
            pages_checked: outcome.pages_checked,
            page_errors: outcome.page_errors,
        };
        write_json(&report, std::io::stdout().lock())?;
    } else if !cli.quiet {
        print_summary(&summary);
    }

    if outcome.cancelled {
        anyhow::bail!("check cancelled");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkwalk=info,warn"),
            1 => EnvFilter::new("linkwalk=debug,info"),
            2 => EnvFilter::new("linkwalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancels the token on the first Ctrl-C
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            token.cancel();
        }
    });
}

/// Runs a local crawl, collecting partial results from the event stream
async fn handle_crawl(
    config: Config,
    cli: &Cli,
    token: &CancellationToken,
) -> anyhow::Result<Outcome> {
    let options = CrawlOptions {
        recursive: cli.recursive,
        max_depth: cli.max_depth.unwrap_or(config.checker.max_depth),
    };
    let crawler = Crawler::new(config)?;

    let (tx, rx) = event_channel();
    let progress = tokio::spawn(collect_progress(rx));

    let result = crawler.crawl(&cli.url, options, Some(tx), token).await;
    let partial = progress.await.context("progress task failed")?;

    match result {
        Ok(report) => Ok(Outcome {
            results: report.results,
            pages_checked: report.pages_checked,
            page_errors: report.page_errors,
            cancelled: false,
        }),
        Err(LinkwalkError::Cancelled) => {
            tracing::warn!(
                "Check cancelled after {} pages and {} links",
                partial.pages_checked,
                partial.results.len()
            );
            Ok(Outcome {
                cancelled: true,
                ..partial
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Consumes crawl events, logging progress and keeping what has been committed
async fn collect_progress(mut rx: mpsc::Receiver<CrawlEvent>) -> Outcome {
    let mut outcome = Outcome {
        results: Vec::new(),
        pages_checked: 0,
        page_errors: Vec::new(),
        cancelled: false,
    };

    while let Some(event) = rx.recv().await {
        match &event {
            CrawlEvent::PageStarted { .. } => {}
            CrawlEvent::BatchChecked { page, results, .. } => {
                for result in results.iter().filter(|r| !r.is_working) {
                    tracing::info!("{}", result);
                }
                tracing::debug!(
                    "{}: {:.0}% of links checked",
                    page,
                    event.percent().unwrap_or_default()
                );
                outcome.results.extend(results.iter().cloned());
            }
            CrawlEvent::PageChecked {
                url,
                pages_checked,
                links_found,
            } => {
                tracing::info!(
                    "Page {} done ({} links found, {} pages checked)",
                    url,
                    links_found,
                    pages_checked
                );
                outcome.pages_checked = *pages_checked;
            }
            CrawlEvent::PageFailed { url, error } => {
                outcome.page_errors.push(linkwalk::crawler::PageError {
                    url: url.clone(),
                    message: error.clone(),
                });
            }
        }
    }

    outcome
}

/// Delegates the check to a remote endpoint
async fn handle_remote(
    config: &Config,
    endpoint: &str,
    url: &str,
    token: &CancellationToken,
) -> anyhow::Result<Outcome> {
    let client = build_http_client(&config.user_agent)?;
    match api::fetch_remote_results(&client, endpoint, url, token).await {
        Ok(results) => Ok(Outcome {
            results,
            pages_checked: 1,
            page_errors: Vec::new(),
            cancelled: false,
        }),
        Err(LinkwalkError::Cancelled) => Ok(Outcome {
            results: Vec::new(),
            pages_checked: 0,
            page_errors: Vec::new(),
            cancelled: true,
        }),
        Err(e) => Err(e).context("remote check failed"),
    }
}
