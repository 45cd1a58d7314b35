//! Channel icon download.
//!
//! Icons are small PNG/JPEG files referenced from the catalog. They are
//! fetched as raw bytes; decoding or rendering is the caller's business.

use tracing::debug;

use super::ScrapeError;
use crate::http_client::PortalClient;

/// A downloaded channel icon.
#[derive(Debug, Clone)]
pub struct ChannelIcon {
    /// Raw image bytes as served by the portal.
    pub bytes: Vec<u8>,
    /// Content type reported by the server, when present.
    pub content_type: Option<String>,
}

impl ChannelIcon {
    /// File extension guessed from the content type, falling back to the
    /// portal's usual `png`.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_deref() {
            Some(ct) if ct.contains("jpeg") || ct.contains("jpg") => "jpg",
            Some(ct) if ct.contains("gif") => "gif",
            Some(ct) if ct.contains("webp") => "webp",
            _ => "png",
        }
    }
}

/// Fetch a channel icon.
///
/// An empty body is an error; the portal serves zero-byte responses for
/// icons it has purged.
pub async fn fetch_icon(client: &PortalClient, url: &str) -> Result<ChannelIcon, ScrapeError> {
    debug!("Fetching icon {url}");

    let response = client.inner().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            status,
            url: url.to_string(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let bytes = response.bytes().await?.to_vec();
    if bytes.is_empty() {
        return Err(ScrapeError::Parse(format!("icon at {url} is empty")));
    }

    Ok(ChannelIcon {
        bytes,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[tokio::test]
    async fn downloads_icon_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/posts/tet.png");
            then.status(200)
                .header("content-type", "image/png")
                .body(PNG_MAGIC);
        });

        let client = PortalClient::new().unwrap();
        let icon = fetch_icon(&client, &server.url("/posts/tet.png"))
            .await
            .unwrap();

        assert_eq!(icon.bytes, PNG_MAGIC);
        assert_eq!(icon.extension(), "png");
    }

    #[tokio::test]
    async fn jpeg_content_type_maps_to_jpg_extension() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/posts/ch.jpg");
            then.status(200)
                .header("content-type", "image/jpeg")
                .body("xx");
        });

        let client = PortalClient::new().unwrap();
        let icon = fetch_icon(&client, &server.url("/posts/ch.jpg"))
            .await
            .unwrap();
        assert_eq!(icon.extension(), "jpg");
    }

    #[tokio::test]
    async fn empty_icon_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/posts/gone.png");
            then.status(200).body("");
        });

        let client = PortalClient::new().unwrap();
        let err = fetch_icon(&client, &server.url("/posts/gone.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_icon_surfaces_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/posts/404.png");
            then.status(404);
        });

        let client = PortalClient::new().unwrap();
        let err = fetch_icon(&client, &server.url("/posts/404.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Status { .. }));
    }
}
