//! Crawl engine entry points
//!
//! The engine holds the collaborators shared by every run (page fetcher,
//! fact store, crawler settings) and launches runs. Each launch builds a
//! fresh [`CrawlRun`] and spawns its worker pool on the tokio runtime.

use crate::config::{parse_seed, Config, CrawlerConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::run::{CrawlReport, CrawlRun};
use crate::crawler::worker::run_worker;
use crate::output::{get_results, ResultPage, SortKey};
use crate::storage::{open_store, FactStore};
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Launches crawl runs and serves stored results
#[derive(Clone)]
pub struct CrawlEngine {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn FactStore>,
    settings: CrawlerConfig,
}

impl CrawlEngine {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn FactStore>,
        settings: CrawlerConfig,
    ) -> Self {
        Self {
            fetcher,
            store,
            settings,
        }
    }

    /// Builds an engine with an HTTP fetcher and the configured SQLite store
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        let store = open_store(Path::new(&config.output.database_path))?;

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(store),
            config.crawler.clone(),
        ))
    }

    /// Crawls from a single seed with the default page budget and depth
    pub fn start(&self, url: &str) -> Result<CrawlHandle> {
        self.submit_seeds([url], DEFAULT_MAX_PAGES, DEFAULT_MAX_DEPTH)
    }

    /// Starts a new independent run and returns without waiting for it
    ///
    /// Every seed must be an absolute http/https URL. Repeated seeds are
    /// queued once. The run processes at most `max_pages` pages across all
    /// of its workers.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any seed fails to parse; no worker is
    /// started in that case.
    pub fn submit_seeds<I, S>(&self, seeds: I, max_pages: u32, max_depth: u32) -> Result<CrawlHandle>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds = seeds
            .into_iter()
            .map(|seed| parse_seed(seed.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let run = Arc::new(CrawlRun::new(&self.settings, max_pages, max_depth));
        let queued = run.seed(seeds);

        tracing::info!(
            seeds = queued,
            max_pages,
            max_depth,
            workers = self.settings.workers,
            depth_policy = ?self.settings.depth_policy,
            "Starting crawl run"
        );

        if queued == 0 && run.stops_when_drained() {
            tracing::info!("No seeds to crawl, run finished");
            run.shutdown();
        }

        let mut workers = JoinSet::new();
        for id in 0..self.settings.workers {
            workers.spawn(run_worker(
                id,
                Arc::clone(&run),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.store),
            ));
        }

        Ok(CrawlHandle { run, workers })
    }

    /// Returns one page of stored facts, optionally sorted
    ///
    /// `sort_by` accepts `email` or `phone`; anything else keeps store order.
    pub fn get_results(&self, page: usize, size: usize, sort_by: &str) -> Result<ResultPage> {
        Ok(get_results(
            self.store.as_ref(),
            page,
            size,
            SortKey::parse(sort_by),
        )?)
    }

    pub fn store(&self) -> &Arc<dyn FactStore> {
        &self.store
    }

    pub fn settings(&self) -> &CrawlerConfig {
        &self.settings
    }
}

/// Handle to a running crawl
pub struct CrawlHandle {
    run: Arc<CrawlRun>,
    workers: JoinSet<()>,
}

impl CrawlHandle {
    /// Asks the run to stop
    ///
    /// Idle workers wake immediately. Fetches already in flight finish or
    /// fail on their own.
    pub fn shutdown(&self) {
        self.run.shutdown();
    }

    /// Current counters without waiting
    pub fn progress(&self) -> CrawlReport {
        self.run.report()
    }

    pub fn is_stopped(&self) -> bool {
        self.run.is_stopped()
    }

    /// Token that stops this run when cancelled, for use from other tasks
    pub fn stop_token(&self) -> CancellationToken {
        self.run.shutdown_token().clone()
    }

    /// Waits for every worker to exit and returns the final counters
    pub async fn wait(mut self) -> Result<CrawlReport> {
        while let Some(joined) = self.workers.join_next().await {
            joined?;
        }

        let report = self.run.report();
        tracing::info!(
            pages = report.pages_processed,
            failed = report.pages_failed,
            facts = report.facts_saved,
            duplicates = report.duplicates_discarded,
            links = report.links_enqueued,
            "Crawl run finished"
        );
        Ok(report)
    }
}
