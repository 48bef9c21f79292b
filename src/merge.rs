//! Merge stage - combines per-site outputs into one corpus
//!
//! Scans a crawl directory for `<site>/data.json` documents and keeps the
//! first-seen record per article id, tagging each kept record with the site
//! it came from. Site directories are visited in sorted name order so the
//! first-seen winner is deterministic.

use crate::store::ArticleRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An article record plus its provenance tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedArticleRecord {
    #[serde(flatten)]
    pub article: ArticleRecord,
    /// Name of the site directory this record came from
    pub source: String,
}

/// Merges every `<crawl_dir>/<site>/data.json` into one corpus mapping.
///
/// A subdirectory without a readable, well-formed `data.json` contributes
/// nothing. For ids present in several sites, the record from the first
/// (sorted) site wins.
pub fn merge_site_outputs(
    crawl_dir: &Path,
) -> crate::Result<IndexMap<String, MergedArticleRecord>> {
    let mut site_dirs: Vec<PathBuf> = std::fs::read_dir(crawl_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    site_dirs.sort();

    let mut merged = IndexMap::new();

    for dir in site_dirs {
        let source = match dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };

        let Some(articles) = load_site_data(&dir.join("data.json")) else {
            tracing::debug!("No usable data.json under {}, skipping", dir.display());
            continue;
        };

        for (id, article) in articles {
            if !merged.contains_key(&id) {
                merged.insert(
                    id,
                    MergedArticleRecord {
                        article,
                        source: source.clone(),
                    },
                );
            }
        }
    }

    Ok(merged)
}

/// Merges and writes the corpus document to `output`.
pub fn merge_to_file(crawl_dir: &Path, output: &Path) -> crate::Result<usize> {
    let merged = merge_site_outputs(crawl_dir)?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&merged)?;
    std::fs::write(output, json)?;

    tracing::info!("Merged {} articles into {}", merged.len(), output.display());
    Ok(merged.len())
}

/// Reads one site's data.json; any read or parse failure yields `None`
fn load_site_data(path: &Path) -> Option<IndexMap<String, ArticleRecord>> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord {
            url: "https://example.com/a".to_string(),
            date: String::new(),
            title: title.to_string(),
            images: vec![],
            content: String::new(),
        }
    }

    fn write_site(crawl_dir: &Path, site: &str, articles: &[(&str, ArticleRecord)]) {
        let dir = crawl_dir.join(site);
        std::fs::create_dir_all(&dir).unwrap();
        let map: IndexMap<String, ArticleRecord> = articles
            .iter()
            .map(|(id, a)| (id.to_string(), a.clone()))
            .collect();
        let json = serde_json::to_string_pretty(&map).unwrap();
        std::fs::write(dir.join("data.json"), json).unwrap();
    }

    #[test]
    fn test_first_seen_wins_across_sites() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "alpha", &[("shared-id", record("from alpha"))]);
        write_site(dir.path(), "beta", &[("shared-id", record("from beta"))]);

        let merged = merge_site_outputs(dir.path()).unwrap();

        assert_eq!(merged.len(), 1);
        let kept = &merged["shared-id"];
        assert_eq!(kept.article.title, "from alpha");
        assert_eq!(kept.source, "alpha");
    }

    #[test]
    fn test_distinct_ids_all_kept_with_sources() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "alpha", &[("id-a", record("A"))]);
        write_site(dir.path(), "beta", &[("id-b", record("B"))]);

        let merged = merge_site_outputs(dir.path()).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["id-a"].source, "alpha");
        assert_eq!(merged["id-b"].source, "beta");
    }

    #[test]
    fn test_unreadable_site_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "alpha", &[("id-a", record("A"))]);

        // A site directory with corrupt output
        let broken = dir.path().join("broken");
        std::fs::create_dir_all(&broken).unwrap();
        std::fs::write(broken.join("data.json"), "{ not json").unwrap();

        // And one with no data.json at all
        std::fs::create_dir_all(dir.path().join("empty")).unwrap();

        let merged = merge_site_outputs(dir.path()).unwrap();
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_stray_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "alpha", &[("id-a", record("A"))]);
        std::fs::write(dir.path().join("notes.txt"), "not a site").unwrap();

        let merged = merge_site_outputs(dir.path()).unwrap();
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merged_record_serializes_flat_with_source() {
        let merged = MergedArticleRecord {
            article: record("T"),
            source: "alpha".to_string(),
        };
        let json = serde_json::to_string(&merged).unwrap();

        // Flattened article fields sit beside the source tag
        assert!(json.contains("\"title\":\"T\""));
        assert!(json.contains("\"source\":\"alpha\""));
        assert!(!json.contains("\"article\""));
    }

    #[test]
    fn test_merge_to_file_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path(), "alpha", &[("id-a", record("A"))]);

        let output = dir.path().join("database").join("database.json");
        let count = merge_to_file(dir.path(), &output).unwrap();

        assert_eq!(count, 1);
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.contains("\"source\": \"alpha\""));
    }
}
