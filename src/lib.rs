//! `teletap` - Command-line IPTV portal client
//!
//! # Features
//!
//! - **Channel catalog**: scrapes the portal index into name / page / icon
//! - **EPG schedules**: per-channel program tables with current-program detection
//! - **Stream resolution**: undoes the PlayerJS payload obfuscation to
//!   recover the live HLS URL
//! - **Playback**: probes HLS variants and hands off to `mpv`/`vlc`/`ffplay`
//!
//! # Example
//!
//! ```rust,no_run
//! use teletap::http_client::PortalClient;
//! use teletap::scrape::{ChannelListScraper, PortalScraper};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PortalClient::new()?;
//!     let channels = ChannelListScraper::new(teletap::DEFAULT_PORTAL)?
//!         .load(&client)
//!         .await?;
//!     println!("{} channels", channels.len());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod hls;
pub mod http_client;
pub mod player;
pub mod scrape;

pub use channel::{current_program_index, ChannelInfo, ChannelProgram, ProgramTime, ProgramTimeError};
pub use config::{Config, DEFAULT_PORTAL};
pub use hls::{HlsVariant, ManifestProbe, StreamQuality};
pub use http_client::PortalClient;
pub use scrape::{ChannelListScraper, PortalScraper, ProgramScraper, ScrapeError, VideoUrlScraper};

/// Version of teletap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
