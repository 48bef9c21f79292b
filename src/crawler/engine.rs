//! Crawl engine - depth-bounded, deduplicated, same-origin traversal
//!
//! The engine drives the whole per-site crawl:
//! - visited-set tracking with at-most-once dispatch per URL
//! - depth limiting and per-URL should-crawl gating
//! - article-record assembly through the image pipeline
//! - unconditional politeness delay between page visits
//!
//! Traversal is single-task and sequential, driven by an explicit work-list
//! with a depth tag per pending URL rather than recursion, so a deep link
//! graph cannot exhaust the host call stack. Children are pushed in reverse
//! document order, which keeps the visit sequence depth-first and in
//! document order.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::extract_same_origin_links;
use crate::crawler::strategy::ExtractionStrategy;
use crate::ids::article_id;
use crate::images::ImagePipeline;
use crate::store::{ArticleRecord, MetadataStore};
use scraper::Html;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// One crawl run over one site
pub struct CrawlEngine<S> {
    strategy: S,
    fetcher: Fetcher,
    images: ImagePipeline,
    max_depth: u32,
    delay: Duration,
    max_pages: Option<u64>,
    visited: HashSet<String>,
    store: MetadataStore,
}

impl<S: ExtractionStrategy> CrawlEngine<S> {
    /// Builds an engine owning its visited set and store for one run.
    ///
    /// The strategy, fetcher, and image pipeline are injected; the engine
    /// never constructs its own collaborators.
    pub fn new(
        config: &CrawlerConfig,
        strategy: S,
        fetcher: Fetcher,
        images: ImagePipeline,
    ) -> Self {
        Self {
            strategy,
            fetcher,
            images,
            max_depth: config.max_depth,
            delay: Duration::from_millis(config.delay_ms),
            max_pages: config.max_pages,
            visited: HashSet::new(),
            store: MetadataStore::new(),
        }
    }

    /// Crawls each seed to exhaustion, in order, starting at depth 0.
    ///
    /// Seeds are not crawled concurrently; the politeness delay paces the
    /// entire run.
    pub async fn run(&mut self, seeds: &[Url]) {
        for seed in seeds {
            tracing::info!("Crawling seed {}", seed);
            self.crawl_from(seed).await;
        }

        tracing::info!(
            "Crawl finished: {} pages visited, {} articles extracted",
            self.visited.len(),
            self.store.len()
        );
    }

    /// Depth-first traversal from one seed.
    async fn crawl_from(&mut self, seed: &Url) {
        let mut pending: Vec<(Url, u32)> = vec![(seed.clone(), 0)];

        while let Some((url, depth)) = pending.pop() {
            if let Some(cap) = self.max_pages {
                if self.visited.len() as u64 >= cap {
                    tracing::info!("Reached max-pages cap of {}, stopping dispatch", cap);
                    return;
                }
            }

            // Skip checks, short-circuited in this order; should_crawl is
            // never consulted for a depth-exhausted or visited URL
            if depth > self.max_depth
                || self.visited.contains(url.as_str())
                || !self.strategy.should_crawl(&url)
            {
                continue;
            }

            // Mark before fetching: a URL reachable by two paths at the same
            // depth is dispatched at most once
            self.visited.insert(url.to_string());

            let Some(html) = self.fetcher.fetch(&url).await else {
                tracing::debug!("No content for {}, abandoning branch", url);
                continue;
            };

            // The parsed document is not Send; everything that needs it runs
            // in this block so it is dropped before the next await
            let (record, links) = {
                let document = Html::parse_document(&html);
                let record = self.strategy.extract(&url, &html, &document);
                let links = if depth < self.max_depth {
                    extract_same_origin_links(&document, &url)
                } else {
                    Vec::new()
                };
                (record, links)
            };

            if let Some(raw) = record {
                let id = article_id(url.as_str(), &raw.title);
                let images = self.images.process(&raw.images).await;
                self.store.insert(
                    id,
                    ArticleRecord {
                        url: raw.url,
                        date: raw.date,
                        title: raw.title,
                        images,
                        content: raw.content,
                    },
                );
            }
            // A page without a record still contributes its links below:
            // hub and index pages seed further traversal

            tokio::time::sleep(self.delay).await;

            // Reverse push keeps document order on the LIFO work-list
            for link in links.into_iter().rev() {
                pending.push((link, depth + 1));
            }

            if self.visited.len() % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} pending, {} articles",
                    self.visited.len(),
                    pending.len(),
                    self.store.len()
                );
            }
        }
    }

    /// Number of URLs dispatched so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of articles extracted so far
    pub fn article_count(&self) -> usize {
        self.store.len()
    }

    /// Shuts down the fetch backend and hands the accumulated store to the
    /// caller for persistence.
    pub async fn finish(self) -> MetadataStore {
        self.fetcher.shutdown().await;
        self.store
    }
}
