//! vncrawl: a news-article crawler
//!
//! This crate implements a depth-bounded, same-origin crawler for news sites.
//! Article extraction is delegated to a pluggable per-site strategy; extracted
//! records flow through an image download pipeline and are persisted as a JSON
//! document per site. Downstream stages merge per-site documents into one
//! corpus and canonicalize date fields.

pub mod config;
pub mod crawler;
pub mod dates;
pub mod ids;
pub mod images;
pub mod merge;
pub mod store;

use thiserror::Error;

/// Main error type for vncrawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date error: {0}")]
    Date(#[from] DateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// Errors raised by the date canonicalization stage
#[derive(Debug, Error)]
pub enum DateError {
    #[error("Unrecognized date format: {0:?}")]
    Unrecognized(String),
}

/// Result type alias for vncrawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, ExtractionStrategy, Fetcher, RawArticleRecord, RawImageRef};
pub use store::{ArticleRecord, ImageRecord, MetadataStore};
