//! Page fetching behind one backend-agnostic contract
//!
//! Two interchangeable backends, selected at configuration time: a stateless
//! HTTP client (one connection pool reused for the whole run) and a headless
//! browser for sites requiring script-rendered content. Both return `None`
//! on any failure — network error, timeout, non-success status — so the
//! engine's failure handling never branches on the backend.

use crate::config::{Backend, CrawlerConfig};
use crate::CrawlError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fixed settle time after navigation, giving scripts a chance to render
const BROWSER_SETTLE: Duration = Duration::from_secs(2);

/// A configured fetch backend
pub enum Fetcher {
    Http {
        client: Client,
    },
    Browser {
        browser: Browser,
        timeout: Duration,
    },
}

impl Fetcher {
    /// Builds the backend selected by the configuration.
    ///
    /// The browser variant launches a Chrome instance up front; its event
    /// handler is drained on a background task for the life of the run.
    pub async fn connect(config: &CrawlerConfig) -> crate::Result<Self> {
        match config.backend {
            Backend::Http => {
                let client = build_http_client(config)?;
                Ok(Fetcher::Http { client })
            }
            Backend::Browser => {
                let mut builder = BrowserConfig::builder()
                    .arg("--no-sandbox")
                    .arg("--disable-dev-shm-usage")
                    .arg(format!("--user-agent={}", config.user_agent));

                if !config.headless {
                    builder = builder.with_head();
                }

                let browser_config = builder.build().map_err(CrawlError::Browser)?;

                let (browser, mut handler) = Browser::launch(browser_config)
                    .await
                    .map_err(|e| CrawlError::Browser(e.to_string()))?;

                tokio::spawn(async move { while handler.next().await.is_some() {} });

                Ok(Fetcher::Browser {
                    browser,
                    timeout: Duration::from_secs(config.timeout_secs),
                })
            }
        }
    }

    /// Retrieves the raw page content for a URL, or `None` on any failure
    pub async fn fetch(&self, url: &Url) -> Option<String> {
        match self {
            Fetcher::Http { client } => fetch_http(client, url).await,
            Fetcher::Browser { browser, timeout } => fetch_browser(browser, *timeout, url).await,
        }
    }

    /// Releases backend resources; closes the browser instance if one runs
    pub async fn shutdown(self) {
        if let Fetcher::Browser { mut browser, .. } = self {
            if let Err(e) = browser.close().await {
                tracing::warn!("Browser close error: {}", e);
            }
        }
    }
}

/// Builds the shared HTTP client for the stateless-request backend
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

async fn fetch_http(client: &Client, url: &Url) -> Option<String> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Fetch failed for {}: {}", url, e);
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Non-success status {} for {}", status, url);
        return None;
    }

    // Body decoding honors the server-declared charset, with UTF-8 fallback
    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::debug!("Failed to read body for {}: {}", url, e);
            None
        }
    }
}

async fn fetch_browser(browser: &Browser, timeout: Duration, url: &Url) -> Option<String> {
    let page = match tokio::time::timeout(timeout, browser.new_page(url.as_str())).await {
        Ok(Ok(page)) => page,
        Ok(Err(e)) => {
            tracing::debug!("Failed to open page for {}: {}", url, e);
            return None;
        }
        Err(_) => {
            tracing::debug!("Navigation timeout for {}", url);
            return None;
        }
    };

    // Best-effort: some pages never fire the navigation event
    let _ = tokio::time::timeout(timeout, page.wait_for_navigation()).await;
    tokio::time::sleep(BROWSER_SETTLE).await;

    let html = match tokio::time::timeout(timeout, page.content()).await {
        Ok(Ok(html)) => Some(html),
        Ok(Err(e)) => {
            tracing::debug!("Failed to get rendered content for {}: {}", url, e);
            None
        }
        Err(_) => {
            tracing::debug!("Content timeout for {}", url);
            None
        }
    };

    if let Err(e) = page.close().await {
        tracing::debug!("Page close error for {} (tab leak): {}", url, e);
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> CrawlerConfig {
        CrawlerConfig {
            backend: Backend::Http,
            max_depth: 2,
            delay_ms: 0,
            timeout_secs: 5,
            user_agent: "TestAgent/1.0".to_string(),
            headless: true,
            max_pages: None,
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&test_config()).is_ok());
    }

    #[tokio::test]
    async fn test_http_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::connect(&test_config()).await.unwrap();
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_http_fetch_non_success_status_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::connect(&test_config()).await.unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        assert!(fetcher.fetch(&url).await.is_none());
    }

    #[tokio::test]
    async fn test_http_fetch_connection_error_is_none() {
        let fetcher = Fetcher::connect(&test_config()).await.unwrap();
        // Nothing listens on this port
        let url = Url::parse("http://127.0.0.1:9/page").unwrap();

        assert!(fetcher.fetch(&url).await.is_none());
    }
}
