//! Same-origin link extraction
//!
//! Given a parsed document and its source URL, returns the absolute URLs
//! reachable from it whose origin equals the source's origin. Relative
//! references are resolved against the source URL. No deduplication happens
//! here — the engine's visited set is the sole dedup mechanism.

use scraper::{Html, Selector};
use url::Url;

/// Extracts same-origin links from a document, in document order.
///
/// Non-HTTP(S) references (javascript:, mailto:, tel:, data:) never survive
/// the origin-equality filter. A fragment-only href resolves to an
/// origin-equal absolute URL and does pass; the visited set absorbs it.
pub fn extract_same_origin_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves an href against the base and keeps it only if origin-equal
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // Special schemes cannot be origin-equal; skip the join work
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    (resolved.origin() == base_url.origin()).then_some(resolved)
}
