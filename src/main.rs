//! `teletap` CLI - browse an IPTV portal and watch its streams

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use teletap::http_client::PortalClient;
use teletap::hls::StreamQuality;
use teletap::Config;

mod cmd;

#[derive(Parser)]
#[command(name = "teletap")]
#[command(about = "IPTV portal client: channel catalog, EPG schedules, live streams")]
#[command(version)]
struct Cli {
    /// Portal base URL (overrides config)
    #[arg(long, global = true)]
    portal: Option<String>,

    /// Config file path (default: <config dir>/teletap/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the channel catalog
    Channels {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Only channels whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show a channel's EPG schedule
    Programs {
        /// Channel name or page URL
        channel: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a channel's live stream URL
    Url {
        /// Channel name or page URL
        channel: String,

        /// Also fetch the manifest and list quality variants
        #[arg(long)]
        probe: bool,

        /// Site key for payload decoding (repeatable, overrides config)
        #[arg(long = "key")]
        keys: Vec<String>,
    },

    /// Download a channel's icon
    Icon {
        /// Channel name
        channel: String,

        /// Output file (default: <channel>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a channel's stream and play it
    Watch {
        /// Channel name or page URL
        channel: String,

        /// Quality: best, worst, or a height like 720
        #[arg(short, long, default_value = "best")]
        quality: StreamQuality,

        /// Site key for payload decoding (repeatable, overrides config)
        #[arg(long = "key")]
        keys: Vec<String>,

        /// Player binary (default: first of mpv, vlc, ffplay)
        #[arg(long)]
        player: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .compact()
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(portal) = cli.portal {
        config.portal = Some(portal);
    }

    let client = PortalClient::new()?;

    match cli.command {
        Commands::Channels { json, filter } => {
            cmd::channels::cmd_channels(&client, config.portal_url(), json, filter.as_deref())
                .await?;
        }
        Commands::Programs { channel, json } => {
            cmd::programs::cmd_programs(&client, config.portal_url(), &channel, json).await?;
        }
        Commands::Url {
            channel,
            probe,
            keys,
        } => {
            cmd::url::cmd_url(&client, &config, &channel, keys, probe).await?;
        }
        Commands::Icon { channel, output } => {
            cmd::icon::cmd_icon(&client, config.portal_url(), &channel, output).await?;
        }
        Commands::Watch {
            channel,
            quality,
            keys,
            player,
        } => {
            cmd::watch::cmd_watch(&client, &config, &channel, quality, keys, player.as_deref())
                .await?;
        }
    }

    Ok(())
}
