//! Date canonicalization
//!
//! The crawl stores date strings exactly as extracted; this module rewrites
//! them to `%Y-%m-%dT%H:%M:%SZ` after the fact. Unlike the crawl-time failure
//! handling, an unrecognized date here is a hard error that aborts the whole
//! file being rewritten — by this stage the data is expected to be clean.

use crate::store::ArticleRecord;
use crate::DateError;
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::path::Path;

/// The canonical output format, ISO-8601 with a literal Z suffix
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source formats recognized in crawled data, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M",   // 17/01/2026 14:30
    "%d/%m/%Y - %H:%M", // 17/01/2026 - 14:30
    "%d-%m-%Y %H:%M",   // 17-01-2026 14:30
    "%d.%m.%Y %H:%M",   // 17.01.2026 14:30
    "%Y-%m-%d %H:%M:%S", // 2026-01-17 14:30:00
    "%Y-%m-%d %H:%M",   // 2026-01-17 14:30
];

/// Date-only formats, normalized to midnight
const DATE_FORMATS: &[&str] = &["%d/%m/%Y"];

/// Canonicalizes a single date string.
///
/// Already-canonical input is returned unchanged, so the operation is
/// idempotent. Otherwise each recognized source format is tried in order;
/// an input matching none of them is an error.
pub fn normalize_date(raw: &str) -> Result<String, DateError> {
    let trimmed = raw.trim();

    // Idempotence: canonical input passes through untouched
    if NaiveDateTime::parse_from_str(trimmed, CANONICAL_FORMAT).is_ok() {
        return Ok(trimmed.to_string());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.format(CANONICAL_FORMAT).to_string());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let dt = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
            return Ok(dt.format(CANONICAL_FORMAT).to_string());
        }
    }

    Err(DateError::Unrecognized(raw.to_string()))
}

/// Rewrites every record's `date` field in a per-site `data.json` in place.
///
/// The first unrecognized date aborts the rewrite for the whole file; no
/// partially-converted document is ever written back.
pub fn convert_file(path: &Path) -> crate::Result<usize> {
    let content = std::fs::read_to_string(path)?;
    let mut articles: IndexMap<String, ArticleRecord> = serde_json::from_str(&content)?;

    for record in articles.values_mut() {
        record.date = normalize_date(&record.date)?;
    }

    let json = serde_json::to_string_pretty(&articles)?;
    std::fs::write(path, json)?;

    Ok(articles.len())
}
