//! HLS manifest probing.
//!
//! Resolved stream URLs point at HLS playlists. This module parses a
//! master playlist into its quality variants (`#EXT-X-STREAM-INF`
//! attribute lines) so the CLI can show what the stream offers and pick a
//! variant for playback. Media playlists (a single bitrate, no variants)
//! are recognized and their live/VOD nature reported from
//! `#EXT-X-ENDLIST`.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::http_client::PortalClient;
use crate::scrape::ScrapeError;

/// Quality selection strategy for stream variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamQuality {
    /// Highest available bitrate / resolution.
    Best,
    /// Lowest available bitrate / resolution.
    Worst,
    /// Closest match to the given height in pixels (e.g., 720, 1080).
    Specific(u32),
}

impl FromStr for StreamQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "worst" => Ok(Self::Worst),
            other => other
                .parse::<u32>()
                .map(Self::Specific)
                .map_err(|_| format!("quality must be 'best', 'worst', or a height: {s:?}")),
        }
    }
}

/// One quality variant of a multi-bitrate stream.
#[derive(Debug, Clone, Serialize)]
pub struct HlsVariant {
    /// Bitrate in bits per second.
    pub bandwidth: u64,
    /// Vertical resolution in pixels, 0 when the playlist omits it.
    pub height: u32,
    /// Codec string (e.g., `"avc1.4d401f,mp4a.40.2"`).
    pub codecs: Option<String>,
    /// Absolute URI of the variant's media playlist.
    pub uri: String,
}

/// Result of probing a playlist URL.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestProbe {
    /// Quality variants, best first. Empty for a media playlist.
    pub variants: Vec<HlsVariant>,
    /// For media playlists: whether the stream is live (no
    /// `#EXT-X-ENDLIST`). `None` for master playlists.
    pub is_live: Option<bool>,
}

impl ManifestProbe {
    /// True when the URL pointed at a master playlist.
    #[must_use]
    pub fn is_master(&self) -> bool {
        !self.variants.is_empty()
    }
}

/// Parse a master playlist into quality variants, best (highest
/// bandwidth) first. Returns an empty vec for a media playlist.
#[must_use]
pub fn parse_master_playlist(content: &str, manifest_url: &str) -> Vec<HlsVariant> {
    let base_url = manifest_url.rsplit_once('/').map_or("", |(base, _)| base);

    let mut variants = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix("#EXT-X-STREAM-INF:") {
            let attrs = parse_attributes(rest);
            let bandwidth = attrs
                .get("BANDWIDTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let resolution = attrs.get("RESOLUTION").cloned();
            let codecs = attrs.get("CODECS").cloned();

            if let Some(uri_line) = lines.next() {
                if !uri_line.starts_with('#') {
                    let uri = resolve_url(base_url, uri_line.trim());
                    let height = resolution
                        .as_ref()
                        .and_then(|r| r.split('x').nth(1))
                        .and_then(|h| h.parse().ok())
                        .unwrap_or(0);

                    variants.push(HlsVariant {
                        bandwidth,
                        height,
                        codecs,
                        uri,
                    });
                }
            }
        }
    }

    // Sort by bandwidth (quality) descending
    variants.sort_by(|a, b| b.bandwidth.cmp(&a.bandwidth));

    variants
}

/// Select a variant by quality preference. `None` only for an empty list.
#[must_use]
pub fn select_variant<'a>(
    variants: &'a [HlsVariant],
    quality: StreamQuality,
) -> Option<&'a HlsVariant> {
    if variants.is_empty() {
        return None;
    }

    match quality {
        StreamQuality::Best => variants.first(),
        StreamQuality::Worst => variants.last(),
        StreamQuality::Specific(height) => variants
            .iter()
            .min_by_key(|v| (i64::from(v.height) - i64::from(height)).abs()),
    }
}

/// Fetch a playlist URL and report its variants.
pub async fn probe(client: &PortalClient, url: &str) -> Result<ManifestProbe, ScrapeError> {
    let response = client.inner().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            status,
            url: url.to_string(),
        });
    }

    let content = response.text().await?;
    if !content.starts_with("#EXTM3U") {
        return Err(ScrapeError::Parse(format!(
            "{url} is not an HLS playlist"
        )));
    }

    let variants = parse_master_playlist(&content, url);
    let is_live = if variants.is_empty() {
        Some(!content.contains("#EXT-X-ENDLIST"))
    } else {
        None
    };

    debug!("Probed {} variants from {url}", variants.len());
    Ok(ManifestProbe { variants, is_live })
}

/// Parse an `#EXT-X-STREAM-INF` attribute list, handling quoted values.
fn parse_attributes(attr_str: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let mut chars = attr_str.chars().peekable();

    while chars.peek().is_some() {
        let key: String = chars.by_ref().take_while(|&c| c != '=').collect();
        if key.is_empty() {
            break;
        }

        let value = if chars.peek() == Some(&'"') {
            chars.next(); // consume opening quote
            let v: String = chars.by_ref().take_while(|&c| c != '"').collect();
            chars.next(); // consume comma if present
            v
        } else {
            chars.by_ref().take_while(|&c| c != ',').collect()
        };

        attrs.insert(key.trim().to_string(), value.trim().to_string());
    }

    attrs
}

fn resolve_url(base: &str, relative: &str) -> String {
    if relative.starts_with("http://") || relative.starts_with("https://") {
        relative.to_string()
    } else if relative.starts_with('/') {
        // Absolute path, keep only the origin from base
        if let Some(idx) = base.find("://") {
            if let Some(end) = base[idx + 3..].find('/') {
                format!("{}{}", &base[..idx + 3 + end], relative)
            } else {
                format!("{base}{relative}")
            }
        } else {
            relative.to_string()
        }
    } else {
        format!("{base}/{relative}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U\n\
#EXT-X-STREAM-INF:BANDWIDTH=1280000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"\n\
360/index.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=4500000,RESOLUTION=1920x1080\n\
/hls/1080/index.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=2800000,RESOLUTION=1280x720\n\
https://cdn.example/720/index.m3u8\n";

    #[test]
    fn parses_and_sorts_variants_best_first() {
        let variants = parse_master_playlist(MASTER, "http://edge.example/live/master.m3u8");
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].height, 1080);
        assert_eq!(variants[0].bandwidth, 4_500_000);
        assert_eq!(variants[2].height, 360);
        assert_eq!(
            variants[2].codecs.as_deref(),
            Some("avc1.4d401e,mp4a.40.2")
        );
    }

    #[test]
    fn resolves_relative_absolute_and_full_uris() {
        let variants = parse_master_playlist(MASTER, "http://edge.example/live/master.m3u8");
        let uris: Vec<&str> = variants.iter().map(|v| v.uri.as_str()).collect();
        assert!(uris.contains(&"http://edge.example/live/360/index.m3u8"));
        assert!(uris.contains(&"http://edge.example/hls/1080/index.m3u8"));
        assert!(uris.contains(&"https://cdn.example/720/index.m3u8"));
    }

    #[test]
    fn media_playlist_has_no_variants() {
        let media = "#EXTM3U\n#EXT-X-TARGETDURATION:6\n#EXTINF:6.0,\nseg0.ts\n";
        assert!(parse_master_playlist(media, "http://e/x.m3u8").is_empty());
    }

    #[test]
    fn selects_by_quality() {
        let variants = parse_master_playlist(MASTER, "http://edge.example/live/master.m3u8");
        assert_eq!(select_variant(&variants, StreamQuality::Best).unwrap().height, 1080);
        assert_eq!(select_variant(&variants, StreamQuality::Worst).unwrap().height, 360);
        assert_eq!(
            select_variant(&variants, StreamQuality::Specific(700)).unwrap().height,
            720
        );
        assert!(select_variant(&[], StreamQuality::Best).is_none());
    }

    #[test]
    fn quality_parses_from_cli_strings() {
        assert_eq!("best".parse::<StreamQuality>().unwrap(), StreamQuality::Best);
        assert_eq!("WORST".parse::<StreamQuality>().unwrap(), StreamQuality::Worst);
        assert_eq!(
            "720".parse::<StreamQuality>().unwrap(),
            StreamQuality::Specific(720)
        );
        assert!("ultra".parse::<StreamQuality>().is_err());
    }

    #[test]
    fn attribute_parser_handles_quoted_commas() {
        let attrs = parse_attributes("BANDWIDTH=100,CODECS=\"a,b\",RESOLUTION=1x2");
        assert_eq!(attrs.get("BANDWIDTH").unwrap(), "100");
        assert_eq!(attrs.get("CODECS").unwrap(), "a,b");
        assert_eq!(attrs.get("RESOLUTION").unwrap(), "1x2");
    }

    mod probe {
        use super::*;
        use httpmock::prelude::*;

        #[tokio::test]
        async fn probes_master_playlist() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(GET).path("/live/master.m3u8");
                then.status(200).body(MASTER);
            });

            let client = PortalClient::new().unwrap();
            let result = probe(&client, &server.url("/live/master.m3u8"))
                .await
                .unwrap();
            assert!(result.is_master());
            assert_eq!(result.variants.len(), 3);
            assert_eq!(result.is_live, None);
        }

        #[tokio::test]
        async fn probes_live_media_playlist() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(GET).path("/live/index.m3u8");
                then.status(200)
                    .body("#EXTM3U\n#EXT-X-TARGETDURATION:6\n#EXTINF:6.0,\nseg0.ts\n");
            });

            let client = PortalClient::new().unwrap();
            let result = probe(&client, &server.url("/live/index.m3u8"))
                .await
                .unwrap();
            assert!(!result.is_master());
            assert_eq!(result.is_live, Some(true));
        }

        #[tokio::test]
        async fn non_playlist_body_is_an_error() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(GET).path("/oops");
                then.status(200).body("<html>not a playlist</html>");
            });

            let client = PortalClient::new().unwrap();
            let err = probe(&client, &server.url("/oops")).await.unwrap_err();
            assert!(matches!(err, ScrapeError::Parse(_)));
        }
    }
}
