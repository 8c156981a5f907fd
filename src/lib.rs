//! Contact Crawler: a concurrent contact-fact harvester
//!
//! This crate crawls web pages reachable from a set of seed URLs, extracts
//! email addresses, phone numbers and postal addresses from the visible page
//! text, and persists every fact not already stored for its source page.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Contact Crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Empty page body from {0}")]
    EmptyBody(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl CrawlerError {
    /// Short name of the error class, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Fetch(crawler::FetchError::Status { .. }) => "http_status",
            Self::Fetch(crawler::FetchError::Request { .. }) => "network",
            Self::Storage(_) => "storage",
            Self::EmptyBody(_) => "empty_body",
            Self::Reqwest(_) => "http_client",
            Self::Worker(_) => "worker",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Contact Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlHandle, CrawlReport};
pub use output::{ResultPage, SortKey};
pub use storage::{ContactFact, FactKind, FactStore, SqliteFactStore};
