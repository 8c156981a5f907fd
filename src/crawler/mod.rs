//! Crawler module for concurrent page fetching and fact harvesting
//!
//! This module contains the core crawling logic, including:
//! - Engine entry points that launch independent crawl runs
//! - Per-run frontier, visited set and page budget
//! - The worker loop and per-page processing
//! - HTTP fetching and HTML parsing

mod engine;
mod fetcher;
mod frontier;
mod parser;
mod run;
mod worker;

pub use engine::{CrawlEngine, CrawlHandle};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use frontier::{CrawlTask, Frontier, VisitedSet};
pub use parser::{parse_html, ParsedPage};
pub use run::{CrawlReport, CrawlRun, PageBudget};
pub use worker::{process_url, PageOutcome};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl from the configured seeds
///
/// Builds an engine from `config`, launches one run over `config.seeds` with
/// the configured budget and depth, and waits for it to finish.
pub async fn crawl(config: &Config) -> Result<CrawlReport> {
    let engine = CrawlEngine::from_config(config)?;
    let handle = engine.submit_seeds(
        &config.seeds,
        config.crawler.max_pages,
        config.crawler.max_depth,
    )?;
    handle.wait().await
}
