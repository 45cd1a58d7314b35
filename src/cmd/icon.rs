use std::path::PathBuf;

use anyhow::{bail, Result};
use tokio::fs;

use teletap::http_client::PortalClient;
use teletap::scrape::fetch_icon;

use super::resolve_channel;

/// Download a channel icon to disk.
pub async fn cmd_icon(
    client: &PortalClient,
    portal: &str,
    channel: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let channel = resolve_channel(client, portal, channel).await?;
    if channel.icon_url.is_empty() {
        bail!("direct page URLs carry no icon; pass a channel name instead");
    }

    let icon = fetch_icon(client, &channel.icon_url).await?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}.{}",
            sanitize_filename(&channel.name),
            icon.extension()
        ))
    });

    fs::write(&path, &icon.bytes).await?;
    println!("💾 Saved {} bytes to {}", icon.bytes.len(), path.display());

    Ok(())
}

/// Turn a channel name into a safe filename stem.
fn sanitize_filename(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() { c } else { '_' }
        })
        .collect();
    let stem = stem.trim_matches('_').to_string();
    if stem.is_empty() {
        "channel".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_channel_names() {
        assert_eq!(sanitize_filename("History 2"), "History_2");
        assert_eq!(sanitize_filename("ТЕТ"), "ТЕТ");
        assert_eq!(sanitize_filename("***"), "channel");
    }
}
