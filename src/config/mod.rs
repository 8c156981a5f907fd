//! Configuration module for Contact Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use contact_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Page budget: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DepthPolicy, FetcherConfig, OutputConfig, DEFAULT_ACCEPT,
    DEFAULT_ACCEPT_LANGUAGE, DEFAULT_IDLE_WAIT_MS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_seed, validate};
