//! Live stream URL extraction from a channel page.
//!
//! The channel page embeds a PlayerJS invocation in an inline script:
//!
//! ```text
//! var kodk="…"; var kos="…";
//! var player=new Playerjs({id:"preroll",file:"<obfuscated>"});
//! ```
//!
//! The `file:` payload decodes (see [`playerjs`]) to the stream URL with
//! `{v1}`/`{v2}` placeholders that the `kodk` and `kos` variables fill.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::{playerjs, PortalScraper, ScrapeError};

static SCRIPT: Lazy<Selector> = Lazy::new(|| Selector::parse("script").unwrap());

/// Marker identifying the script that drives the video player.
const PLAYER_MARKER: &str = "Playerjs";

static KODK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"var kodk="([^"]*)";"#).unwrap());
static KOS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"var kos="([^"]*)";"#).unwrap());
static PLAYER_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"var player=new Playerjs\(\{id:"preroll",file:"([^"]*)"\}\);"#).unwrap()
});

/// Scraper resolving the live stream URL of a channel page.
pub struct VideoUrlScraper {
    page_url: String,
    keys: Vec<String>,
}

impl VideoUrlScraper {
    /// Create a scraper for the given channel page, with the site keys
    /// used by the payload obfuscation (may be empty, see [`crate::config`]).
    #[must_use]
    pub fn new(page_url: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            page_url: page_url.into(),
            keys,
        }
    }
}

/// First capture of `pattern` in `text`, or a parse error naming the
/// pattern.
fn capture(text: &str, pattern: &Regex) -> Result<String, ScrapeError> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ScrapeError::Parse(format!("no match for pattern {pattern}")))
}

#[async_trait::async_trait]
impl PortalScraper for VideoUrlScraper {
    type Output = String;

    fn url(&self) -> String {
        self.page_url.clone()
    }

    fn parse(&self, html: &str) -> Result<String, ScrapeError> {
        let document = Html::parse_document(html);

        let script = document
            .select(&SCRIPT)
            .map(|el| el.html())
            .find(|code| code.contains(PLAYER_MARKER))
            .ok_or_else(|| {
                ScrapeError::Parse("no script drives the video player".to_string())
            })?;

        let kodk = capture(&script, &KODK)?;
        let kos = capture(&script, &KOS)?;
        let payload = capture(&script, &PLAYER_FILE)?;

        debug!("Decoding {} byte payload", payload.len());
        let decoded = playerjs::decode(&payload, &self.keys)?;

        Ok(decoded.replace("{v1}", &kodk).replace("{v2}", &kos))
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::*;

    const PAGE: &str = "http://ip.viks.tv/447-tet_11.html";

    fn keys() -> Vec<String> {
        vec!["alpha".to_string(), "beta".to_string()]
    }

    /// Build a payload the way the portal does: two base64 wraps with a
    /// scattered key token and a two-character junk prefix.
    fn obfuscate(plain: &str, keys: &[String]) -> String {
        let tokens = playerjs::key_tokens(keys);
        let wrap = |s: &str| {
            let mut b64 = STANDARD.encode(s.as_bytes());
            if let Some(token) = tokens.first() {
                b64.insert_str(b64.len() / 2, token);
            }
            format!("o0{b64}")
        };
        wrap(&wrap(plain))
    }

    fn page_with(script: &str) -> String {
        format!(
            "<html><head><script src=\"/jquery.js\"></script></head>\
             <body><div class=\"player\"></div><script>{script}</script></body></html>"
        )
    }

    #[test]
    fn resolves_stream_url() {
        let payload = obfuscate("https://edge.example/{v1}/{v2}/index.m3u8", &keys());
        let script = format!(
            "var kodk=\"live123\";var kos=\"tok456\";\
             var player=new Playerjs({{id:\"preroll\",file:\"{payload}\"}});"
        );
        let url = VideoUrlScraper::new(PAGE, keys())
            .parse(&page_with(&script))
            .unwrap();
        assert_eq!(url, "https://edge.example/live123/tok456/index.m3u8");
    }

    #[test]
    fn url_without_placeholders_passes_through() {
        let payload = obfuscate("http://edge.example/direct.m3u8", &keys());
        let script = format!(
            "var kodk=\"a\";var kos=\"b\";\
             var player=new Playerjs({{id:\"preroll\",file:\"{payload}\"}});"
        );
        let url = VideoUrlScraper::new(PAGE, keys())
            .parse(&page_with(&script))
            .unwrap();
        assert_eq!(url, "http://edge.example/direct.m3u8");
    }

    #[test]
    fn page_without_player_script_is_an_error() {
        let err = VideoUrlScraper::new(PAGE, keys())
            .parse("<html><body><script>var x=1;</script></body></html>")
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[test]
    fn player_script_missing_variables_is_an_error() {
        let script = "var player=new Playerjs({id:\"preroll\",file:\"o0abc\"});";
        let err = VideoUrlScraper::new(PAGE, keys())
            .parse(&page_with(script))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[test]
    fn corrupt_payload_is_a_decode_error() {
        let script = "var kodk=\"a\";var kos=\"b\";\
             var player=new Playerjs({id:\"preroll\",file:\"o0!!!!\"});";
        let err = VideoUrlScraper::new(PAGE, keys())
            .parse(&page_with(script))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Decode(_)));
    }
}
