use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteEntry};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.site)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth, delay_ms, timeout_secs are non-negative by type

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if let Some(max_pages) = config.max_pages {
        if max_pages == 0 {
            return Err(ConfigError::Validation(
                "max-pages must be >= 1 when set; omit it for an unbounded crawl".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates site entries
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();

    for site in sites {
        // The name doubles as an output subdirectory
        if site.name.is_empty() {
            return Err(ConfigError::Validation(
                "site name cannot be empty".to_string(),
            ));
        }

        if site.name.contains(['/', '\\', '.']) {
            return Err(ConfigError::Validation(format!(
                "site name '{}' must be usable as a directory name",
                site.name
            )));
        }

        if !names.insert(site.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name '{}'",
                site.name
            )));
        }

        if site.seeds.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Site '{}' must have at least one seed URL",
                site.name
            )));
        }

        for seed in &site.seeds {
            let url = Url::parse(seed).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
            })?;

            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::Validation(format!(
                    "Seed URL '{}' must use an HTTP(S) scheme",
                    seed
                )));
            }
        }

        validate_selector(&site.name, "title-selector", &site.title_selector)?;
        validate_selector(&site.name, "content-selector", &site.content_selector)?;
        validate_selector(&site.name, "image-selector", &site.image_selector)?;
        if let Some(date_selector) = &site.date_selector {
            validate_selector(&site.name, "date-selector", date_selector)?;
        }
    }

    Ok(())
}

/// Rejects malformed CSS selectors at load time rather than mid-crawl
fn validate_selector(site: &str, field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!(
            "Site '{}' has an invalid {}: {:?}",
            site, field, e
        ))
    })?;
    Ok(())
}
