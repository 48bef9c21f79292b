//! Content-addressed identifiers
//!
//! Article and image ids are MD5 hex digests truncated to 16 characters.
//! The truncation width is part of the on-disk contract: merged corpora from
//! separate runs dedup by comparing these ids, so the algorithm must not
//! change between runs.

/// Derives a 16-character hex id from the given text.
///
/// Article ids hash `url + title`; image ids hash the image URL alone.
///
/// # Examples
///
/// ```
/// use vncrawl::ids::hash_id;
///
/// let id = hash_id("https://example.com/a");
/// assert_eq!(id.len(), 16);
/// assert_eq!(id, hash_id("https://example.com/a"));
/// ```
pub fn hash_id(text: &str) -> String {
    let digest = md5::compute(text.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Derives the article id for a (url, title) pair.
///
/// Two crawls of the same URL with the same extracted title collide to the
/// same key; a changed title yields a distinct record.
pub fn article_id(url: &str, title: &str) -> String {
    hash_id(&format!("{}{}", url, title))
}
