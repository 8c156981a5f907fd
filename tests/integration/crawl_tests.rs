//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the real
//! HTTP fetcher through the full crawl cycle end-to-end.

use contact_crawler::config::{Config, CrawlerConfig, FetcherConfig, OutputConfig};
use contact_crawler::crawler::{build_http_client, crawl, HttpFetcher};
use contact_crawler::output::load_statistics;
use contact_crawler::storage::{open_store, FactKind, FactStore, SqliteFactStore};
use contact_crawler::CrawlEngine;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings suited to a small local site
fn test_settings(stop_when_drained: bool) -> CrawlerConfig {
    CrawlerConfig {
        workers: 4,
        idle_wait_ms: 20,
        stop_when_drained,
        ..CrawlerConfig::default()
    }
}

fn test_engine(store: Arc<SqliteFactStore>, settings: CrawlerConfig) -> CrawlEngine {
    let client = build_http_client(&FetcherConfig {
        timeout_secs: Some(10),
        ..FetcherConfig::default()
    })
    .expect("Failed to build HTTP client");
    CrawlEngine::new(Arc::new(HttpFetcher::with_client(client)), store, settings)
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a three page site: an index linking to a contacts and an about page
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <p>Write to Info@Example.com</p>
            <a href="/contacts">Contacts</a>
            <a href="/about">About</a>
            <a href="/contacts#map">Map</a>
            <a href="mailto:info@example.com">Mail</a>
            </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/contacts",
        r#"<html><body>
            <p>Phone: 8 (912) 345-67-89, fax +7 912 345 67 89</p>
            <p>Адрес: 101000, г. Москва, ул. Тверская, д. 7</p>
            <p>info@example.com</p>
            <script>var support = "hidden@example.com";</script>
            <a href="/">Home</a>
            </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/about",
        r#"<html><body><p>Call 123456 or 12-34</p><a href="/contacts">Contacts</a></body></html>"#
            .to_string(),
    )
    .await;
}

async fn run_to_end(engine: &CrawlEngine, seed: &str, max_pages: u32) -> contact_crawler::CrawlReport {
    let handle = engine
        .submit_seeds([seed], max_pages, 3)
        .expect("Failed to submit seeds");
    tokio::time::timeout(Duration::from_secs(20), handle.wait())
        .await
        .expect("Crawl did not finish")
        .expect("Crawl failed")
}

#[tokio::test]
async fn test_full_crawl_collects_contacts() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let store = Arc::new(SqliteFactStore::open_in_memory().unwrap());
    let engine = test_engine(store.clone(), test_settings(true));

    let report = run_to_end(&engine, &format!("{}/", mock_server.uri()), 100).await;

    assert_eq!(report.pages_processed, 3);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.links_enqueued, 2);
    assert_eq!(report.urls_pending, 0);

    let counts = store.count_by_kind().unwrap();
    assert_eq!(counts[&FactKind::Email], 2);
    assert_eq!(counts[&FactKind::Phone], 1);
    assert_eq!(counts[&FactKind::Address], 1);

    let contacts_url = format!("{}/contacts", mock_server.uri());
    let facts = store.find_all().unwrap();
    assert!(facts.iter().any(|fact| fact.source_url() == contacts_url
        && fact.phone() == Some("+79123456789")));
    assert!(facts.iter().any(|fact| fact.source_url() == contacts_url
        && fact.address() == Some("101000, г. Москва, ул. Тверская, д. 7")));
    assert!(facts.iter().all(|fact| fact.value() != "hidden@example.com"));
}

#[tokio::test]
async fn test_fetcher_sends_configured_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "contact-crawler-test/1.0"))
        .and(header("accept-language", "ru-RU"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok@example.com</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher_config = FetcherConfig {
        user_agent: "contact-crawler-test/1.0".to_string(),
        accept_language: "ru-RU".to_string(),
        ..FetcherConfig::default()
    };
    let fetcher = HttpFetcher::new(&fetcher_config).unwrap();
    let store = Arc::new(SqliteFactStore::open_in_memory().unwrap());
    let engine = CrawlEngine::new(Arc::new(fetcher), store, test_settings(true));

    let report = run_to_end(&engine, &format!("{}/", mock_server.uri()), 10).await;

    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.facts_saved, 1);
}

#[tokio::test]
async fn test_server_error_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<p>team@example.com</p>".to_string()).await;

    let store = Arc::new(SqliteFactStore::open_in_memory().unwrap());
    let engine = test_engine(store.clone(), test_settings(true));

    let report = run_to_end(&engine, &format!("{}/", mock_server.uri()), 100).await;

    assert_eq!(report.pages_processed, 3);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.facts_saved, 1);
}

#[tokio::test]
async fn test_empty_body_counts_as_failure() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "   ".to_string()).await;

    let store = Arc::new(SqliteFactStore::open_in_memory().unwrap());
    let engine = test_engine(store.clone(), test_settings(true));

    let report = run_to_end(&engine, &format!("{}/", mock_server.uri()), 100).await;

    assert_eq!(report.pages_processed, 1);
    assert_eq!(report.pages_failed, 1);
    assert!(store.find_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_page_budget_ends_crawl_without_drain_stop() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let store = Arc::new(SqliteFactStore::open_in_memory().unwrap());
    let engine = test_engine(store, test_settings(false));

    let report = run_to_end(&engine, &format!("{}/", mock_server.uri()), 2).await;

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.urls_visited, 3);
}

#[tokio::test]
async fn test_second_run_stores_nothing_new() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let store = Arc::new(SqliteFactStore::open_in_memory().unwrap());
    let engine = test_engine(store.clone(), test_settings(true));
    let seed = format!("{}/", mock_server.uri());

    let first = run_to_end(&engine, &seed, 100).await;
    let second = run_to_end(&engine, &seed, 100).await;

    assert_eq!(first.facts_saved, 4);
    assert_eq!(second.pages_processed, 3);
    assert_eq!(second.facts_saved, 0);
    assert_eq!(store.find_all().unwrap().len(), 4);
}

#[tokio::test]
async fn test_crawl_from_config_persists_to_file() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("contacts.db");

    let config = Config {
        crawler: test_settings(true),
        fetcher: FetcherConfig::default(),
        output: OutputConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        },
        seeds: vec![format!("{}/", mock_server.uri())],
    };

    let report = tokio::time::timeout(Duration::from_secs(20), crawl(&config))
        .await
        .expect("Crawl did not finish")
        .expect("Crawl failed");
    assert_eq!(report.facts_saved, 4);

    let reopened = open_store(&db_path).unwrap();
    let stats = load_statistics(&reopened).unwrap();
    assert_eq!(stats.total_facts, 4);
    assert_eq!(stats.source_pages, 2);

    let engine = CrawlEngine::from_config(&config).unwrap();
    let page = engine.get_results(0, 2, "email").unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 2);
    assert!(page.items[0].email().is_none());
}
