//! Worker loop and per-page processing
//!
//! Each worker repeatedly claims a slot in the run's page budget, takes a
//! URL from the frontier and runs the fetch, extract, persist and expand
//! cycle on it. A failure on one page is logged and counted; it never stops
//! the worker or the pool.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::CrawlTask;
use crate::crawler::parser::parse_html;
use crate::crawler::run::CrawlRun;
use crate::extract::extract_facts;
use crate::storage::{ContactFact, FactStore, SaveOutcome};
use crate::CrawlerError;
use std::sync::Arc;

/// What one successfully processed page contributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    pub facts_saved: usize,
    pub duplicates: usize,
    pub links_enqueued: usize,
}

/// Runs one worker until the budget is used up or the run stops
pub(crate) async fn run_worker(
    id: usize,
    run: Arc<CrawlRun>,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn FactStore>,
) {
    tracing::debug!(worker = id, "Worker started");

    loop {
        if run.is_stopped() {
            break;
        }

        if !run.budget().try_claim() {
            tracing::debug!(worker = id, "Page budget fully claimed");
            break;
        }

        let task = match run
            .frontier()
            .next(run.idle_wait(), run.shutdown_token())
            .await
        {
            Some(task) => task,
            None => {
                run.budget().release();
                break;
            }
        };

        match process_url(&task, fetcher.as_ref(), store.as_ref(), &run).await {
            Ok(outcome) => {
                tracing::debug!(
                    worker = id,
                    url = %task.url,
                    facts = outcome.facts_saved,
                    links = outcome.links_enqueued,
                    "Page processed"
                );
            }
            Err(e) => {
                run.record_failure();
                tracing::warn!(
                    worker = id,
                    url = %task.url,
                    error_kind = e.kind(),
                    error = %e,
                    "Error processing page"
                );
            }
        }

        let processed = run.budget().record_processed();

        if run.frontier().complete() && run.stops_when_drained() {
            tracing::info!("Frontier drained, stopping run");
            run.shutdown();
        }

        if processed >= run.budget().limit() {
            tracing::info!(pages = processed, "Page budget reached");
            break;
        }
    }

    tracing::debug!(worker = id, "Worker exited");
}

/// Fetches one page, stores its novel facts and queues its new links
///
/// # Errors
///
/// Fetch failures, blank bodies and store errors are returned to the worker,
/// which logs them and moves on. A fact the store already holds is not an
/// error.
pub async fn process_url(
    task: &CrawlTask,
    fetcher: &dyn PageFetcher,
    store: &dyn FactStore,
    run: &CrawlRun,
) -> Result<PageOutcome, CrawlerError> {
    let url = task.url.as_str();
    tracing::debug!(url, depth = task.depth, "Processing page");

    let html = fetcher.fetch(&task.url).await?;
    if html.trim().is_empty() {
        return Err(CrawlerError::EmptyBody(url.to_string()));
    }
    tracing::debug!(url, chars = html.len(), "Page loaded");

    let parsed = parse_html(&html, &task.url);
    let facts = extract_facts(&parsed.text);

    let mut outcome = PageOutcome::default();

    // exists-then-save is not atomic; the store reports a lost race as Duplicate
    for (kind, value) in facts.iter() {
        if store.exists(url, kind, value)? {
            continue;
        }

        match store.save(&ContactFact::new(url, kind, value))? {
            SaveOutcome::Inserted => {
                run.record_saved();
                outcome.facts_saved += 1;
                tracing::info!(url, %kind, value, "Stored contact fact");
            }
            SaveOutcome::Duplicate => {
                run.record_duplicate();
                outcome.duplicates += 1;
                tracing::debug!(url, %kind, value, "Discarded duplicate fact");
            }
        }
    }

    if run.should_expand(task.depth) {
        outcome.links_enqueued = run.enqueue_links(parsed.links, task.depth + 1);
        tracing::debug!(url, added = outcome.links_enqueued, "Links added to frontier");
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrawlerConfig, DepthPolicy};
    use crate::crawler::fetcher::FetchError;
    use crate::storage::{FactKind, SqliteFactStore, StorageResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use url::Url;

    struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    impl StaticFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    /// Store whose existence check always misses, as if another worker saved
    /// the same fact in between
    struct RacingStore {
        inner: SqliteFactStore,
    }

    impl FactStore for RacingStore {
        fn exists(&self, _: &str, _: FactKind, _: &str) -> StorageResult<bool> {
            Ok(false)
        }
        fn save(&self, fact: &ContactFact) -> StorageResult<SaveOutcome> {
            self.inner.save(fact)
        }
        fn find_all(&self) -> StorageResult<Vec<ContactFact>> {
            self.inner.find_all()
        }
        fn count_by_kind(&self) -> StorageResult<HashMap<FactKind, u64>> {
            self.inner.count_by_kind()
        }
        fn count_sources(&self) -> StorageResult<u64> {
            self.inner.count_sources()
        }
    }

    fn run(depth_policy: DepthPolicy) -> CrawlRun {
        let settings = CrawlerConfig {
            depth_policy,
            ..CrawlerConfig::default()
        };
        CrawlRun::new(&settings, 10, 1)
    }

    fn task(url: &str, depth: u32) -> CrawlTask {
        CrawlTask {
            url: Url::parse(url).unwrap(),
            depth,
        }
    }

    const CONTACTS: &str = r#"<html><body>
        <p>Email: Office@Example.com or office@example.com</p>
        <p>Phone: 8(912)345-67-89, +7 912 345 67 89, 123456</p>
        <a href="/about">About</a><a href="/about">About again</a>
        <a href="https://example.com/contacts">Self</a>
        <a href="/faq#top">FAQ</a>
    </body></html>"#;

    #[tokio::test]
    async fn test_process_stores_each_fact_once() {
        let fetcher = StaticFetcher::new(&[("https://example.com/contacts", CONTACTS)]);
        let store = SqliteFactStore::open_in_memory().unwrap();
        let run = run(DepthPolicy::Ignore);
        run.seed(vec![Url::parse("https://example.com/contacts").unwrap()]);

        let outcome = process_url(
            &task("https://example.com/contacts", 0),
            &fetcher,
            &store,
            &run,
        )
        .await
        .unwrap();

        assert_eq!(outcome.facts_saved, 2);
        let facts = store.find_all().unwrap();
        assert_eq!(
            facts,
            vec![
                ContactFact::new(
                    "https://example.com/contacts",
                    FactKind::Email,
                    "office@example.com"
                ),
                ContactFact::new(
                    "https://example.com/contacts",
                    FactKind::Phone,
                    "+79123456789"
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_process_enqueues_new_links_only() {
        let fetcher = StaticFetcher::new(&[("https://example.com/contacts", CONTACTS)]);
        let store = SqliteFactStore::open_in_memory().unwrap();
        let run = run(DepthPolicy::Ignore);
        run.seed(vec![Url::parse("https://example.com/contacts").unwrap()]);
        run.frontier().try_pop().unwrap();

        let outcome = process_url(
            &task("https://example.com/contacts", 0),
            &fetcher,
            &store,
            &run,
        )
        .await
        .unwrap();

        assert_eq!(outcome.links_enqueued, 1);
        let queued = run.frontier().try_pop().unwrap();
        assert_eq!(queued.url.as_str(), "https://example.com/about");
        assert_eq!(queued.depth, 1);
        assert!(run.frontier().try_pop().is_none());
    }

    #[tokio::test]
    async fn test_reprocessing_page_saves_nothing_new() {
        let fetcher = StaticFetcher::new(&[("https://example.com/contacts", CONTACTS)]);
        let store = SqliteFactStore::open_in_memory().unwrap();
        let run = run(DepthPolicy::Ignore);
        let page = task("https://example.com/contacts", 0);

        process_url(&page, &fetcher, &store, &run).await.unwrap();
        let second = process_url(&page, &fetcher, &store, &run).await.unwrap();

        assert_eq!(second.facts_saved, 0);
        assert_eq!(second.duplicates, 0);
        assert_eq!(store.find_all().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_lost_existence_race_is_discarded() {
        let fetcher = StaticFetcher::new(&[("https://example.com/contacts", CONTACTS)]);
        let store = RacingStore {
            inner: SqliteFactStore::open_in_memory().unwrap(),
        };
        let run = run(DepthPolicy::Ignore);
        let page = task("https://example.com/contacts", 0);

        process_url(&page, &fetcher, &store, &run).await.unwrap();
        let second = process_url(&page, &fetcher, &store, &run).await.unwrap();

        assert_eq!(second.facts_saved, 0);
        assert_eq!(second.duplicates, 2);
        assert_eq!(store.find_all().unwrap().len(), 2);
        assert_eq!(run.report().duplicates_discarded, 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error() {
        let fetcher = StaticFetcher::new(&[]);
        let store = SqliteFactStore::open_in_memory().unwrap();
        let run = run(DepthPolicy::Ignore);

        let result = process_url(&task("https://example.com/missing", 0), &fetcher, &store, &run).await;
        assert!(matches!(result, Err(CrawlerError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_blank_page_is_skipped() {
        let fetcher = StaticFetcher::new(&[("https://example.com/blank", "  \n ")]);
        let store = SqliteFactStore::open_in_memory().unwrap();
        let run = run(DepthPolicy::Ignore);

        let result = process_url(&task("https://example.com/blank", 0), &fetcher, &store, &run).await;
        assert!(matches!(result, Err(CrawlerError::EmptyBody(_))));
        assert!(run.frontier().is_empty());
    }

    #[tokio::test]
    async fn test_enforced_depth_stops_expansion() {
        let fetcher = StaticFetcher::new(&[("https://example.com/contacts", CONTACTS)]);
        let store = SqliteFactStore::open_in_memory().unwrap();
        let run = run(DepthPolicy::Enforce);

        let outcome = process_url(
            &task("https://example.com/contacts", 1),
            &fetcher,
            &store,
            &run,
        )
        .await
        .unwrap();

        assert_eq!(outcome.links_enqueued, 0);
        assert_eq!(outcome.facts_saved, 2);
    }
}
