//! In-memory article store and end-of-run persistence
//!
//! One store is exclusively owned by one crawl engine run. Records accumulate
//! in memory keyed by article id and are flushed to `data.json` once, at the
//! end of the run. Key order in the output file is insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A downloaded image attached to an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Content-addressed id, also the binary's filename stem under `image/`
    #[serde(rename = "id_image")]
    pub id: String,
    pub caption: String,
    pub author: String,
}

/// The persisted unit: one extracted article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    /// Date string as extracted; canonicalized later by the convert stage
    pub date: String,
    pub title: String,
    pub images: Vec<ImageRecord>,
    pub content: String,
}

/// Mapping of article id to record, flushed once at end-of-run
#[derive(Debug, Default)]
pub struct MetadataStore {
    articles: IndexMap<String, ArticleRecord>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, overwriting any existing entry with the same id.
    ///
    /// Within one run the later extraction wins; the entry keeps its original
    /// position in the output document.
    pub fn insert(&mut self, id: String, record: ArticleRecord) {
        self.articles.insert(id, record);
    }

    pub fn get(&self, id: &str) -> Option<&ArticleRecord> {
        self.articles.get(id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Writes the full mapping to `path`, replacing any prior file.
    ///
    /// The document is written to a temporary sibling first and renamed into
    /// place, so a failed run never leaves a truncated `data.json` behind.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(&self.articles)?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;

        tracing::info!("Wrote {} articles to {}", self.articles.len(), path.display());
        Ok(())
    }
}
