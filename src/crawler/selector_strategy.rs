//! Selector-driven extraction strategy
//!
//! Site integrations are selector rules in the config file, not code: a URL
//! substring gate plus CSS selectors for title, body, date, and images. One
//! generic strategy interprets those rules against any site's document tree.

use crate::config::SiteEntry;
use crate::crawler::strategy::{ExtractionStrategy, RawArticleRecord, RawImageRef};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// An [`ExtractionStrategy`] configured from a `[[site]]` entry
pub struct SelectorStrategy {
    url_must_contain: Vec<String>,
    title: Selector,
    content: Selector,
    date: Option<Selector>,
    image: Selector,
    paragraph: Selector,
}

impl SelectorStrategy {
    /// Builds the strategy from a site entry.
    ///
    /// Selectors were already validated at config load; a parse failure here
    /// still surfaces as a `ConfigError` rather than a panic.
    pub fn from_site(site: &SiteEntry) -> Result<Self, ConfigError> {
        Ok(Self {
            url_must_contain: site.url_must_contain.clone(),
            title: parse_selector(&site.title_selector)?,
            content: parse_selector(&site.content_selector)?,
            date: site
                .date_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            image: parse_selector(&site.image_selector)?,
            paragraph: parse_selector("p")?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::Validation(format!("Invalid selector '{}': {:?}", selector, e)))
}

impl ExtractionStrategy for SelectorStrategy {
    fn should_crawl(&self, url: &Url) -> bool {
        self.url_must_contain.is_empty()
            || self
                .url_must_contain
                .iter()
                .any(|pattern| url.as_str().contains(pattern))
    }

    fn extract(&self, url: &Url, _raw_html: &str, document: &Html) -> Option<RawArticleRecord> {
        // No title, no article — hub and index pages fall out here
        let title_element = document.select(&self.title).next()?;
        let title = element_text(title_element);
        if title.is_empty() {
            return None;
        }

        let content_element = document.select(&self.content).next();
        let content = content_element.map(|el| body_text(el, &self.paragraph)).unwrap_or_default();

        let date = self
            .date
            .as_ref()
            .and_then(|selector| document.select(selector).next())
            .map(element_text)
            .unwrap_or_default();

        // Image search is scoped to the body when one was found
        let images = match content_element {
            Some(el) => self.collect_images(el.select(&self.image), url),
            None => self.collect_images(document.select(&self.image), url),
        };

        Some(RawArticleRecord {
            url: url.to_string(),
            date,
            title,
            images,
            content,
        })
    }
}

impl SelectorStrategy {
    fn collect_images<'a, I>(&self, elements: I, base_url: &Url) -> Vec<RawImageRef>
    where
        I: Iterator<Item = ElementRef<'a>>,
    {
        elements
            .filter_map(|img| {
                // Lazy-loaded images keep the real URL in data-src
                let src = img
                    .value()
                    .attr("src")
                    .filter(|s| !s.is_empty())
                    .or_else(|| img.value().attr("data-src"))?;

                let resolved = resolve_image_url(src, base_url)?;
                let alt = img.value().attr("alt").unwrap_or_default().to_string();

                Some(RawImageRef {
                    url: resolved,
                    caption: alt.clone(),
                    alt,
                    author: String::new(),
                })
            })
            .collect()
    }
}

/// Turns an image src into an absolute URL string.
///
/// Protocol-relative references are upgraded to https; data-embedded URIs are
/// kept as-is so the image pipeline can skip them uniformly.
fn resolve_image_url(src: &str, base_url: &Url) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    if src.starts_with("data:") {
        return Some(src.to_string());
    }

    if let Some(rest) = src.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }

    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }

    base_url.join(src).ok().map(|u| u.to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Joins the body's paragraph texts with blank lines; falls back to the whole
/// element's text when the body has no paragraph markup
fn body_text(element: ElementRef<'_>, paragraph: &Selector) -> String {
    let paragraphs: Vec<String> = element
        .select(paragraph)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        element_text(element)
    } else {
        paragraphs.join("\n\n")
    }
}
