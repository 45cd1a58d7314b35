//! Portal scraping.
//!
//! Each page the portal serves is handled by one scraper:
//!
//! - [`ChannelListScraper`]: the index page into a channel catalog
//! - [`ProgramScraper`]: a channel page's EPG table into schedule rows
//! - [`VideoUrlScraper`]: a channel page's player script into the live
//!   stream URL (see [`playerjs`] for the deobfuscation scheme)
//! - [`fetch_icon`]: a channel icon as raw image bytes
//!
//! # Architecture
//!
//! [`PortalScraper`] separates fetching from parsing: `parse` is a pure
//! function of the page HTML, so every selector and regex is unit-testable
//! against fixture pages, and `load` glues it to a [`PortalClient`].
//!
//! # Example
//!
//! ```rust,no_run
//! use teletap::http_client::PortalClient;
//! use teletap::scrape::{ChannelListScraper, PortalScraper};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PortalClient::new()?;
//! let channels = ChannelListScraper::new("http://ip.viks.tv")?.load(&client).await?;
//! println!("{} channels", channels.len());
//! # Ok(())
//! # }
//! ```

mod channel_list;
mod icon;
pub mod playerjs;
mod programs;
mod video_url;

pub use channel_list::ChannelListScraper;
pub use icon::{fetch_icon, ChannelIcon};
pub use programs::ProgramScraper;
pub use video_url::VideoUrlScraper;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::channel::ProgramTimeError;
use crate::http_client::PortalClient;

/// Error scraping the portal.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page loaded but did not contain the expected structure.
    #[error("unexpected page content: {0}")]
    Parse(String),

    /// The PlayerJS payload could not be decoded.
    #[error("stream URL decoding failed: {0}")]
    Decode(String),

    /// The server answered with a non-success status.
    #[error("portal returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// Network-level failure (DNS, timeout, TLS, body read).
    #[error("request failed")]
    Http(#[from] reqwest::Error),

    /// A URL scraped off the page could not be joined or parsed.
    #[error("invalid URL")]
    Url(#[from] url::ParseError),

    /// An EPG time cell was malformed.
    #[error(transparent)]
    Time(#[from] ProgramTimeError),
}

/// A scraper for one kind of portal page.
///
/// Implementors provide the page URL and a pure HTML-to-output parse;
/// the provided [`load`](PortalScraper::load) method performs the fetch,
/// checks the HTTP status, and runs the parse.
#[async_trait]
pub trait PortalScraper: Send + Sync {
    /// Parsed result type.
    type Output: Send;

    /// URL of the page this scraper reads.
    fn url(&self) -> String;

    /// Extract the output from the page HTML.
    fn parse(&self, html: &str) -> Result<Self::Output, ScrapeError>;

    /// Fetch the page and parse it.
    async fn load(&self, client: &PortalClient) -> Result<Self::Output, ScrapeError> {
        let url = self.url();
        debug!("Loading {url}");

        let response = client.inner().get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { status, url });
        }

        let html = response.text().await?;
        debug!("Parsing {} bytes from {url}", html.len());
        self.parse(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    /// Minimal scraper to exercise the provided `load` implementation.
    struct FixedUrl(String);

    #[async_trait]
    impl PortalScraper for FixedUrl {
        type Output = usize;

        fn url(&self) -> String {
            self.0.clone()
        }

        fn parse(&self, html: &str) -> Result<usize, ScrapeError> {
            Ok(html.len())
        }
    }

    #[tokio::test]
    async fn load_parses_successful_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("12345");
        });

        let client = PortalClient::new().unwrap();
        let len = FixedUrl(server.url("/page")).load(&client).await.unwrap();
        assert_eq!(len, 5);
    }

    #[tokio::test]
    async fn load_rejects_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(404).body("not found");
        });

        let client = PortalClient::new().unwrap();
        let err = FixedUrl(server.url("/gone")).load(&client).await.unwrap_err();
        match err {
            ScrapeError::Status { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
