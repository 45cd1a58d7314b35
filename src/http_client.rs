//! Portal HTTP client
//!
//! Features:
//! - HTTP/2 with HTTP/1.1 fallback (the portal itself is plain HTTP/1.1)
//! - Brotli, Zstd, Gzip compression (auto-negotiated)
//! - Connection pooling with keep-alive
//! - Browser-like default headers (some IPTV portals reject bare clients)
//! - Never asserts a content type: channel icons come back as `image/png`

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

/// User agent presented to the portal. A stock desktop Chrome string.
pub(crate) const PORTAL_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// HTTP client tuned for scraping an IPTV portal.
pub struct PortalClient {
    client: Client,
}

impl PortalClient {
    /// Create a new portal client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            // Let the server negotiate; the portal speaks HTTP/1.1
            .http2_adaptive_window(true)
            // Keep connections alive for reuse across catalog + page fetches
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            // Compression, auto-negotiated via Accept-Encoding
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .default_headers(Self::default_headers())
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(PORTAL_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9,ru;q=0.8"));
        headers
    }

    /// Fetch a URL and return the raw response.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Response> {
        debug!("Fetching portal page");
        let response = self.client.get(url).send().await?;

        info!(
            status = %response.status(),
            version = ?response.version(),
            content_type = ?response.headers().get("content-type"),
            "Response received"
        );

        Ok(response)
    }

    /// Fetch and return body as string.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch(url).await?;
        let text = response.text().await?;
        Ok(text)
    }

    /// Get the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

impl Default for PortalClient {
    fn default() -> Self {
        Self::new().expect("Failed to create default client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn fetch_text_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/index.html");
            then.status(200).body("<html>hello</html>");
        });

        let client = PortalClient::new().unwrap();
        let body = client
            .fetch_text(&server.url("/index.html"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body, "<html>hello</html>");
    }

    #[tokio::test]
    async fn sends_browser_like_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ua")
                .header("user-agent", PORTAL_USER_AGENT);
            then.status(200).body("ok");
        });

        let client = PortalClient::new().unwrap();
        let body = client.fetch_text(&server.url("/ua")).await.unwrap();

        mock.assert();
        assert_eq!(body, "ok");
    }
}
