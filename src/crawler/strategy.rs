//! The pluggable per-site extraction contract
//!
//! A strategy decides which URLs are article pages and how to pull structured
//! fields from their document tree. It is injected into the crawl engine at
//! construction; the engine itself knows nothing about any particular site.

use scraper::Html;
use url::Url;

/// A raw image reference as found in the page, before download
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImageRef {
    pub url: String,
    pub caption: String,
    /// Alt text, used as the caption fallback by the image pipeline
    pub alt: String,
    pub author: String,
}

/// A strategy's extraction output, immutable once produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticleRecord {
    pub url: String,
    /// Site-specific date string, possibly empty; not normalized here
    pub date: String,
    pub title: String,
    pub images: Vec<RawImageRef>,
    pub content: String,
}

/// Site-specific crawl gating and article extraction.
///
/// `should_crawl` is a pure predicate on URL shape — the engine guarantees it
/// is never consulted for an already-visited or depth-exhausted URL, so
/// implementations must not track crawl state.
///
/// Both operations are synchronous; the engine drops the parsed document
/// before suspending, so implementations may borrow it freely.
pub trait ExtractionStrategy {
    /// Whether the URL is worth fetching at all
    fn should_crawl(&self, url: &Url) -> bool;

    /// Extracts an article record from a fetched page, or `None` when the
    /// page has no parseable article structure (hub and index pages)
    fn extract(&self, url: &Url, raw_html: &str, document: &Html) -> Option<RawArticleRecord>;
}
