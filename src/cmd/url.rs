use anyhow::Result;

use teletap::hls;
use teletap::http_client::PortalClient;
use teletap::scrape::{PortalScraper, VideoUrlScraper};
use teletap::Config;

use super::resolve_channel;

/// Resolve and print a channel's live stream URL.
pub async fn cmd_url(
    client: &PortalClient,
    config: &Config,
    channel: &str,
    keys: Vec<String>,
    probe: bool,
) -> Result<()> {
    let channel = resolve_channel(client, config.portal_url(), channel).await?;

    let keys = if keys.is_empty() {
        config.keys.clone()
    } else {
        keys
    };

    let url = VideoUrlScraper::new(&channel.page_url, keys)
        .load(client)
        .await?;
    println!("{url}");

    if probe {
        let manifest = hls::probe(client, &url).await?;
        if manifest.is_master() {
            eprintln!("\nVariants:");
            for v in &manifest.variants {
                let height = if v.height == 0 {
                    "?".to_string()
                } else {
                    format!("{}p", v.height)
                };
                let codecs = v.codecs.as_deref().unwrap_or("-");
                eprintln!(
                    "  {height:>6}  {:>8} kbps  {codecs}  {}",
                    v.bandwidth / 1000,
                    v.uri
                );
            }
        } else {
            let live = if manifest.is_live == Some(true) {
                "live"
            } else {
                "vod"
            };
            eprintln!("\nMedia playlist ({live}), single quality");
        }
    }

    Ok(())
}
