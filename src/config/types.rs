use serde::Deserialize;

/// Default page budget for a crawl run
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Default link depth accepted by a crawl run
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default upper bound on a single idle wait (milliseconds)
pub const DEFAULT_IDLE_WAIT_MS: u64 = 200;

/// Browser identification sent with every page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default `Accept` header for page requests
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default `Accept-Language` header for page requests
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Main configuration structure for Contact Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// How the `max-depth` setting applies to link expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthPolicy {
    /// Depth is recorded per URL but never limits expansion
    #[default]
    Ignore,

    /// Links found on pages at `max-depth` or deeper are not enqueued
    Enforce,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages a run processes across all workers
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum link depth from the seeds
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Whether `max_depth` is enforced
    #[serde(rename = "depth-policy", default)]
    pub depth_policy: DepthPolicy,

    /// Number of workers in the pool
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Upper bound on one idle wait before a worker re-checks its run (milliseconds)
    #[serde(rename = "idle-wait-ms", default = "default_idle_wait_ms")]
    pub idle_wait_ms: u64,

    /// Stop the run once the frontier is empty and no page is in progress
    #[serde(rename = "stop-when-drained", default)]
    pub stop_when_drained: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            depth_policy: DepthPolicy::default(),
            workers: default_workers(),
            idle_wait_ms: DEFAULT_IDLE_WAIT_MS,
            stop_when_drained: false,
        }
    }
}

/// HTTP identification and timeout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,

    /// Per-request timeout; `None` leaves fetch time unbounded
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            timeout_secs: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_idle_wait_ms() -> u64 {
    DEFAULT_IDLE_WAIT_MS
}

/// One worker per available compute unit
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}
