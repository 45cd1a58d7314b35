//! Channel catalog extraction from the portal index page.
//!
//! The index page marks each channel with the `all_tv` CSS class. Inside
//! such a block, the first link carries the channel page address, the
//! first image the channel icon, and the block text the channel name.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::{PortalScraper, ScrapeError};
use crate::channel::ChannelInfo;

static CHANNEL_BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse(".all_tv").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static ICON: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());

/// Scraper for the portal index page; yields the channel catalog.
pub struct ChannelListScraper {
    base: Url,
}

impl ChannelListScraper {
    /// Create a scraper for the given portal base URL.
    pub fn new(portal: &str) -> Result<Self, ScrapeError> {
        Ok(Self {
            base: Url::parse(portal)?,
        })
    }

    /// Parse one channel block. `None` when the block is missing its link
    /// or icon; such blocks are navigation leftovers, not channels.
    fn parse_channel(&self, block: ElementRef<'_>) -> Option<ChannelInfo> {
        let name = block.text().collect::<String>().trim().to_string();

        let Some(href) = block
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            warn!("Channel block without link: {}", block.html());
            return None;
        };

        let Some(src) = block
            .select(&ICON)
            .next()
            .and_then(|img| img.value().attr("src"))
        else {
            warn!("Channel block without icon: {}", block.html());
            return None;
        };

        let page_url = self.absolute(href)?;
        let icon_url = self.absolute(src)?;

        Some(ChannelInfo {
            name,
            page_url,
            icon_url,
        })
    }

    /// Resolve a scraped attribute against the portal base. Absolute URLs
    /// pass through untouched.
    fn absolute(&self, raw: &str) -> Option<String> {
        match self.base.join(raw) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!("Unresolvable portal link {raw:?}: {e}");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl PortalScraper for ChannelListScraper {
    type Output = Vec<ChannelInfo>;

    fn url(&self) -> String {
        self.base.to_string()
    }

    fn parse(&self, html: &str) -> Result<Vec<ChannelInfo>, ScrapeError> {
        let document = Html::parse_document(html);

        let channels: Vec<ChannelInfo> = document
            .select(&CHANNEL_BLOCK)
            .filter_map(|block| self.parse_channel(block))
            .collect();

        if channels.is_empty() {
            return Err(ScrapeError::Parse(
                "no channels found on the index page".to_string(),
            ));
        }

        debug!("Parsed {} channels", channels.len());
        Ok(channels)
    }
}
