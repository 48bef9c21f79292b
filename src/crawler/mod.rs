//! Crawl engine and its collaborators
//!
//! The engine drives a depth-bounded, deduplicated, same-origin traversal.
//! Page retrieval, article extraction, and image acquisition are delegated to
//! the fetcher, the injected extraction strategy, and the image pipeline.

pub mod engine;
pub mod fetcher;
pub mod links;
pub mod selector_strategy;
pub mod strategy;

pub use engine::CrawlEngine;
pub use fetcher::Fetcher;
pub use links::extract_same_origin_links;
pub use selector_strategy::SelectorStrategy;
pub use strategy::{ExtractionStrategy, RawArticleRecord, RawImageRef};
