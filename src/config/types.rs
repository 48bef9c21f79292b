use serde::Deserialize;

/// Main configuration structure for vncrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub site: Vec<SiteEntry>,
}

/// Which fetch backend drives page retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Stateless HTTP client, one connection pool reused across the run
    Http,
    /// Headless browser, for sites requiring script-rendered content
    Browser,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Fetch backend to use
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Maximum depth to crawl from seed URLs
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Delay between consecutive page visits (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Run the browser backend without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Cap on URLs dispatched per site; absent means unbounded
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,
}

fn default_backend() -> Backend {
    Backend::Http
}

fn default_max_depth() -> u32 {
    2
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_headless() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<site-name>/` subdirectory per site
    pub directory: String,
}

/// One site integration: seeds plus the selector rules that configure the
/// generic extraction strategy for that site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Site name, used as the output subdirectory and merge provenance tag
    pub name: String,

    /// Seed URLs to start crawling from
    pub seeds: Vec<String>,

    /// Substrings a URL must contain to be crawl-worthy; empty crawls all
    #[serde(rename = "url-must-contain", default)]
    pub url_must_contain: Vec<String>,

    /// Selector for the article title; a page without a match yields no record
    #[serde(rename = "title-selector", default = "default_title_selector")]
    pub title_selector: String,

    /// Selector for the article body container
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,

    /// Selector for the publication date element, if the site exposes one
    #[serde(rename = "date-selector", default)]
    pub date_selector: Option<String>,

    /// Selector for images, scoped to the body container
    #[serde(rename = "image-selector", default = "default_image_selector")]
    pub image_selector: String,
}

fn default_title_selector() -> String {
    "h1".to_string()
}

fn default_content_selector() -> String {
    "article, div.article".to_string()
}

fn default_image_selector() -> String {
    "img".to_string()
}
