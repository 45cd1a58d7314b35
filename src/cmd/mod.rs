//! CLI subcommand implementations.

pub mod channels;
pub mod icon;
pub mod programs;
pub mod url;
pub mod watch;

use anyhow::{bail, Result};

use teletap::http_client::PortalClient;
use teletap::scrape::{ChannelListScraper, PortalScraper};
use teletap::ChannelInfo;

/// Resolve a user-supplied channel argument to a catalog entry.
///
/// Direct URLs skip the catalog fetch. Names are matched against the
/// catalog case-insensitively, exact match first, then unique substring.
pub async fn resolve_channel(
    client: &PortalClient,
    portal: &str,
    query: &str,
) -> Result<ChannelInfo> {
    if query.starts_with("http://") || query.starts_with("https://") {
        return Ok(ChannelInfo {
            name: query.to_string(),
            page_url: query.to_string(),
            icon_url: String::new(),
        });
    }

    let channels = ChannelListScraper::new(portal)?.load(client).await?;
    let needle = query.to_lowercase();

    if let Some(channel) = channels.iter().find(|c| c.name.to_lowercase() == needle) {
        return Ok(channel.clone());
    }

    let matches: Vec<&ChannelInfo> = channels
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [] => bail!("no channel matches {query:?} (try 'teletap channels')"),
        [channel] => Ok((*channel).clone()),
        many => {
            let names: Vec<&str> = many.iter().map(|c| c.name.as_str()).collect();
            bail!("{query:?} is ambiguous: {}", names.join(", "))
        }
    }
}
