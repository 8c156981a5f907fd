//! Frontier queue and visited set for a single crawl run
//!
//! The frontier is a lock-free multi-producer multi-consumer queue paired
//! with a `Notify` so idle workers sleep until a push wakes them. The
//! visited set's `insert` is the atomic test-and-set that guarantees a URL
//! is enqueued at most once per run.

use crossbeam_queue::SegQueue;
use dashmap::DashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A URL waiting to be processed, with its link distance from the seeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: u32,
}

impl CrawlTask {
    pub fn seed(url: Url) -> Self {
        Self { url, depth: 0 }
    }
}

/// Pending work for one run
///
/// `outstanding` counts tasks that are queued or being processed. It is
/// incremented before a push becomes visible and decremented only by
/// [`Frontier::complete`], so it reaches zero exactly when the queue is empty
/// and no popped task can still push new links.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: SegQueue<CrawlTask>,
    outstanding: AtomicUsize,
    notify: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task and wakes one idle worker
    pub fn push(&self, task: CrawlTask) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        self.queue.push(task);
        self.notify.notify_one();
    }

    /// Takes a task without waiting
    pub fn try_pop(&self) -> Option<CrawlTask> {
        self.queue.pop()
    }

    /// Takes a task, waiting while the queue is empty
    ///
    /// Each wait ends on a push, on `stop`, or after `idle_wait`, whichever
    /// comes first; the queue is re-checked after every wake. Returns `None`
    /// only once `stop` is cancelled, and never hands out a task after that
    /// even if some are still queued.
    pub async fn next(&self, idle_wait: Duration, stop: &CancellationToken) -> Option<CrawlTask> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a push between the check and the
            // await still wakes us.
            notified.as_mut().enable();

            if stop.is_cancelled() {
                return None;
            }
            if let Some(task) = self.queue.pop() {
                return Some(task);
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = stop.cancelled() => return None,
                _ = tokio::time::sleep(idle_wait) => {}
            }
        }
    }

    /// Marks one popped task as finished
    ///
    /// Returns true when this completion left the run with no queued and no
    /// in-progress work.
    pub fn complete(&self) -> bool {
        self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1
    }

    /// True when nothing is queued or in progress
    pub fn is_drained(&self) -> bool {
        self.outstanding.load(Ordering::Acquire) == 0
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Every URL ever enqueued during a run
///
/// Grows monotonically and lives exactly as long as its run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<Url>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the URL if absent; returns true only for the caller that added it
    pub fn insert(&self, url: &Url) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.clone())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
