use crate::config::types::{Config, CrawlerConfig, FetcherConfig, OutputConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use url::Url;

/// Largest worker pool a configuration may request
const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.idle_wait_ms < 1 {
        return Err(ConfigError::Validation(
            "idle_wait_ms must be >= 1ms".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    for (name, value) in [
        ("user_agent", &config.user_agent),
        ("accept", &config.accept),
        ("accept_language", &config.accept_language),
    ] {
        if HeaderValue::from_str(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid HTTP header value: {:?}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates seed URLs
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    for seed in seeds {
        parse_seed(seed)?;
    }
    Ok(())
}

/// Parses a seed into an absolute http/https URL
pub fn parse_seed(seed: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert!(parse_seed("https://example.com/").is_ok());
        assert!(parse_seed("http://example.com/contacts").is_ok());
        assert!(parse_seed("  https://example.com/  ").is_ok());

        assert!(parse_seed("").is_err());
        assert!(parse_seed("example.com").is_err());
        assert!(parse_seed("ftp://example.com/").is_err());
        assert!(parse_seed("mailto:user@example.com").is_err());
    }

    #[test]
    fn test_workers_bounds() {
        let mut config = CrawlerConfig::default();
        config.workers = 0;
        assert!(validate_crawler_config(&config).is_err());

        config.workers = MAX_WORKERS + 1;
        assert!(validate_crawler_config(&config).is_err());

        config.workers = 8;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = FetcherConfig::default();
        config.timeout_secs = Some(0);
        assert!(validate_fetcher_config(&config).is_err());

        config.timeout_secs = None;
        assert!(validate_fetcher_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_header_values_rejected() {
        let config = FetcherConfig {
            accept_language: "ru-RU\nX-Injected: 1".to_string(),
            ..FetcherConfig::default()
        };
        assert!(matches!(
            validate_fetcher_config(&config),
            Err(ConfigError::Validation(_))
        ));

        let config = FetcherConfig {
            accept: "text/html\r".to_string(),
            ..FetcherConfig::default()
        };
        assert!(validate_fetcher_config(&config).is_err());

        assert!(validate_fetcher_config(&FetcherConfig::default()).is_ok());
    }
}
