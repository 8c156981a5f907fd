//! Contact Crawler main entry point
//!
//! This is the command-line interface for the contact crawler.

use anyhow::{bail, Context};
use clap::Parser;
use contact_crawler::config::{load_config_with_hash, validate, Config};
use contact_crawler::output::{load_statistics, print_statistics};
use contact_crawler::storage::open_store;
use contact_crawler::{CrawlEngine, CrawlReport, ResultPage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Contact Crawler: harvests emails, phones and addresses from web pages
///
/// Crawls every page reachable from the configured seeds up to a page
/// budget, extracts contact facts from the visible text and stores each fact
/// once per source page.
#[derive(Parser, Debug)]
#[command(name = "contact-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent contact-fact harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Seed URL to crawl instead of the configured seeds (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Override the page budget
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the maximum link depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "results"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "results"])]
    stats: bool,

    /// Print one page of stored facts and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    results: bool,

    /// Result page number, starting at 0
    #[arg(long, default_value_t = 0, requires = "results")]
    page: usize,

    /// Facts per result page
    #[arg(long, default_value_t = 20, requires = "results")]
    size: usize,

    /// Sort results by `email` or `phone`; anything else keeps store order
    #[arg(long, default_value = "", requires = "results")]
    sort_by: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.results {
        handle_results(&config, cli.page, cli.size, &cli.sort_by)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_crawler=info,warn"),
            1 => EnvFilter::new("contact_crawler=debug,info"),
            2 => EnvFilter::new("contact_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides and re-validates the result
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if !cli.seeds.is_empty() {
        config.seeds = cli.seeds.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }

    validate(config).context("Invalid command-line override")?;
    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Contact Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Depth policy: {:?}", config.crawler.depth_policy);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Idle wait: {}ms", config.crawler.idle_wait_ms);
    println!("  Stop when drained: {}", config.crawler.stop_when_drained);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    match config.fetcher.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let store = open_store(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --results mode: prints one page of stored facts
fn handle_results(config: &Config, page: usize, size: usize, sort_by: &str) -> anyhow::Result<()> {
    let engine = CrawlEngine::from_config(config)?;
    let ResultPage { items, total } = engine.get_results(page, size, sort_by)?;

    println!("Facts {} of {} (page {}):", items.len(), total, page);
    for fact in &items {
        println!("  [{}] {}  <- {}", fact.kind(), fact.value(), fact.source_url());
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    if config.seeds.is_empty() {
        bail!("No seed URLs configured; add `seeds` to the config or pass --seed");
    }

    let engine = CrawlEngine::from_config(config)?;
    let handle = engine.submit_seeds(
        &config.seeds,
        config.crawler.max_pages,
        config.crawler.max_depth,
    )?;

    let stop = handle.stop_token();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::info!("Interrupt received, stopping crawl");
                    stop.cancel();
                }
            }
            _ = stop.cancelled() => {}
        }
    });

    let report = handle.wait().await.context("Crawl failed")?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("  Pages processed: {}", report.pages_processed);
    println!("  Pages failed: {}", report.pages_failed);
    println!("  Facts saved: {}", report.facts_saved);
    println!("  Duplicates discarded: {}", report.duplicates_discarded);
    println!("  Links enqueued: {}", report.links_enqueued);
    println!("  URLs visited: {}", report.urls_visited);
    println!("  URLs pending: {}", report.urls_pending);
}
