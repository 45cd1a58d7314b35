use anyhow::Result;
use tracing::warn;

use teletap::hls::{self, StreamQuality};
use teletap::http_client::PortalClient;
use teletap::player;
use teletap::scrape::{PortalScraper, ProgramScraper, VideoUrlScraper};
use teletap::Config;

use super::resolve_channel;

/// Resolve a channel's stream and hand it to an external player.
///
/// The schedule is loaded alongside the stream URL and printed before
/// playback starts; a schedule failure is reported but never blocks
/// playback.
pub async fn cmd_watch(
    client: &PortalClient,
    config: &Config,
    channel: &str,
    quality: StreamQuality,
    keys: Vec<String>,
    preferred_player: Option<&str>,
) -> Result<()> {
    let channel = resolve_channel(client, config.portal_url(), channel).await?;

    let keys = if keys.is_empty() {
        config.keys.clone()
    } else {
        keys
    };

    eprintln!("📡 Resolving stream for: {}", channel.name);
    let url_scraper = VideoUrlScraper::new(&channel.page_url, keys);
    let program_scraper = ProgramScraper::new(&channel.page_url);

    let (url, programs) = futures::join!(
        url_scraper.load(client),
        program_scraper.load(client)
    );
    let url = url?;

    match programs {
        Ok(programs) => {
            for program in &programs {
                eprintln!("   {} | {}", program.time, program.name);
            }
        }
        Err(e) => warn!("Schedule unavailable: {e}"),
    }

    // Pick a specific variant only when asked; players handle master
    // playlists (and their bitrate switching) fine on their own.
    let play_url = if matches!(quality, StreamQuality::Best) {
        url.clone()
    } else {
        match hls::probe(client, &url).await {
            Ok(manifest) => hls::select_variant(&manifest.variants, quality)
                .map_or_else(|| url.clone(), |v| v.uri.clone()),
            Err(e) => {
                warn!("Manifest probe failed, playing the stream as-is: {e}");
                url.clone()
            }
        }
    };

    eprintln!("▶ {play_url}");
    let player = preferred_player.or(config.player.as_deref());
    player::play(&play_url, player, Some(&channel.name)).await
}
