//! External player handoff.
//!
//! Playback is delegated to whatever media player the machine already
//! has. The launcher looks for `mpv`, `vlc`, then `ffplay` on PATH and
//! hands the resolved stream URL over with a window title where the
//! player supports one.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::info;

/// Player binaries tried in order when none is configured.
pub const PLAYERS: &[&str] = &["mpv", "vlc", "ffplay"];

/// Locate a player binary on PATH.
///
/// With `preferred` set, only that binary is considered; otherwise the
/// first of [`PLAYERS`] that resolves wins.
pub fn find_player(preferred: Option<&str>) -> Result<PathBuf> {
    if let Some(name) = preferred {
        return which::which(name)
            .with_context(|| format!("player '{name}' not found in PATH"));
    }

    PLAYERS
        .iter()
        .find_map(|name| which::which(name).ok())
        .with_context(|| format!("no media player found in PATH (tried {})", PLAYERS.join(", ")))
}

/// Arguments for a specific player binary.
fn player_args(binary: &std::path::Path, url: &str, title: Option<&str>) -> Vec<String> {
    let name = binary
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut args = Vec::new();
    match (name.as_str(), title) {
        ("mpv", Some(title)) => args.push(format!("--force-media-title={title}")),
        ("vlc", Some(title)) => {
            args.push("--meta-title".to_string());
            args.push(title.to_string());
        }
        ("ffplay", Some(title)) => {
            args.push("-window_title".to_string());
            args.push(title.to_string());
        }
        _ => {}
    }
    args.push(url.to_string());
    args
}

/// Launch the player on a stream URL and wait for it to exit.
pub async fn play(url: &str, preferred: Option<&str>, title: Option<&str>) -> Result<()> {
    let binary = find_player(preferred)?;
    let args = player_args(&binary, url, title);

    info!("Launching {} {}", binary.display(), args.join(" "));
    let status = Command::new(&binary)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("failed to launch {}", binary.display()))?;

    if !status.success() {
        bail!("{} exited with {status}", binary.display());
    }
    Ok(())
}
