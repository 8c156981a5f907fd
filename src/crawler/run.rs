//! Per-run crawl context
//!
//! A `CrawlRun` owns the frontier, visited set, page budget and counters of
//! exactly one run. Workers share it through an `Arc` and only ever mutate it
//! through atomic operations, so two runs never see each other's state.

use crate::config::{CrawlerConfig, DepthPolicy};
use crate::crawler::frontier::{CrawlTask, Frontier, VisitedSet};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Global page budget shared by every worker of a run
///
/// A worker claims a slot before taking a URL, so the number of pages
/// processed across all workers never exceeds the limit.
#[derive(Debug)]
pub struct PageBudget {
    limit: u32,
    claimed: AtomicU32,
    processed: AtomicU32,
}

impl PageBudget {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            claimed: AtomicU32::new(0),
            processed: AtomicU32::new(0),
        }
    }

    /// Reserves one page slot; false once every slot is taken
    pub fn try_claim(&self) -> bool {
        self.claimed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |claimed| {
                (claimed < self.limit).then_some(claimed + 1)
            })
            .is_ok()
    }

    /// Returns an unused slot
    pub fn release(&self) {
        self.claimed.fetch_sub(1, Ordering::AcqRel);
    }

    /// Counts one finished page and returns the new total
    pub fn record_processed(&self) -> u32 {
        self.processed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn processed(&self) -> u32 {
        self.processed.load(Ordering::Acquire)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_exhausted(&self) -> bool {
        self.processed() >= self.limit
    }
}

/// Summary of a run's progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages whose fetch-and-extract cycle finished, failed ones included
    pub pages_processed: u64,

    /// Pages that produced no facts or links because of an error
    pub pages_failed: u64,

    /// Facts written to the store
    pub facts_saved: u64,

    /// Facts the store rejected as already present
    pub duplicates_discarded: u64,

    /// Discovered links added to the frontier
    pub links_enqueued: u64,

    /// Distinct URLs ever enqueued, seeds included
    pub urls_visited: u64,

    /// URLs still waiting in the frontier
    pub urls_pending: u64,
}

#[derive(Debug, Default)]
struct RunCounters {
    pages_failed: AtomicU64,
    facts_saved: AtomicU64,
    duplicates_discarded: AtomicU64,
    links_enqueued: AtomicU64,
}

/// State of one crawl run
#[derive(Debug)]
pub struct CrawlRun {
    frontier: Frontier,
    visited: VisitedSet,
    budget: PageBudget,
    counters: RunCounters,
    shutdown: CancellationToken,
    max_depth: u32,
    depth_policy: DepthPolicy,
    idle_wait: Duration,
    stop_when_drained: bool,
}

impl CrawlRun {
    pub fn new(settings: &CrawlerConfig, max_pages: u32, max_depth: u32) -> Self {
        Self {
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            budget: PageBudget::new(max_pages),
            counters: RunCounters::default(),
            shutdown: CancellationToken::new(),
            max_depth,
            depth_policy: settings.depth_policy,
            idle_wait: Duration::from_millis(settings.idle_wait_ms),
            stop_when_drained: settings.stop_when_drained,
        }
    }

    /// Marks seeds visited and queues them at depth 0
    ///
    /// Returns how many distinct seeds were queued.
    pub fn seed(&self, seeds: impl IntoIterator<Item = Url>) -> usize {
        let mut queued = 0;
        for url in seeds {
            if self.visited.insert(&url) {
                self.frontier.push(CrawlTask::seed(url));
                queued += 1;
            }
        }
        queued
    }

    /// Queues every link not yet visited in this run
    ///
    /// Returns how many links were newly queued.
    pub fn enqueue_links(&self, links: impl IntoIterator<Item = Url>, depth: u32) -> usize {
        let mut added = 0;
        for url in links {
            if self.visited.insert(&url) {
                self.frontier.push(CrawlTask { url, depth });
                added += 1;
            }
        }
        self.counters
            .links_enqueued
            .fetch_add(added as u64, Ordering::Relaxed);
        added
    }

    /// Whether links found on a page at `depth` may be followed
    pub fn should_expand(&self, depth: u32) -> bool {
        match self.depth_policy {
            DepthPolicy::Ignore => true,
            DepthPolicy::Enforce => depth < self.max_depth,
        }
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn budget(&self) -> &PageBudget {
        &self.budget
    }

    pub fn idle_wait(&self) -> Duration {
        self.idle_wait
    }

    pub fn stops_when_drained(&self) -> bool {
        self.stop_when_drained
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Requests every worker of this run to stop
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub(crate) fn record_failure(&self) {
        self.counters.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_saved(&self) {
        self.counters.facts_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.counters
            .duplicates_discarded
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the run's counters
    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            pages_processed: u64::from(self.budget.processed()),
            pages_failed: self.counters.pages_failed.load(Ordering::Relaxed),
            facts_saved: self.counters.facts_saved.load(Ordering::Relaxed),
            duplicates_discarded: self.counters.duplicates_discarded.load(Ordering::Relaxed),
            links_enqueued: self.counters.links_enqueued.load(Ordering::Relaxed),
            urls_visited: self.visited.len() as u64,
            urls_pending: self.frontier.len() as u64,
        }
    }
}
