use anyhow::Result;

use teletap::http_client::PortalClient;
use teletap::scrape::{ChannelListScraper, PortalScraper};

/// List the portal channel catalog.
pub async fn cmd_channels(
    client: &PortalClient,
    portal: &str,
    json: bool,
    filter: Option<&str>,
) -> Result<()> {
    let mut channels = ChannelListScraper::new(portal)?.load(client).await?;

    if let Some(filter) = filter {
        let needle = filter.to_lowercase();
        channels.retain(|c| c.name.to_lowercase().contains(&needle));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&channels)?);
        return Ok(());
    }

    let width = channels.iter().map(|c| c.name.chars().count()).max().unwrap_or(0);
    for channel in &channels {
        println!("{:width$}  {}", channel.name, channel.page_url);
    }
    println!("\n({} channels)", channels.len());

    Ok(())
}
