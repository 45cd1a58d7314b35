//! Configuration loading.
//!
//! The stream URLs on the portal are obfuscated with a set of site keys
//! that are deliberately not shipped with this crate. Keys, the portal
//! base URL, and the preferred player binary live in an optional TOML
//! file at `<config dir>/teletap/config.toml`:
//!
//! ```toml
//! portal = "http://ip.viks.tv"
//! keys = ["key-one", "key-two"]
//! player = "mpv"
//! ```
//!
//! A missing config file is not an error; everything falls back to
//! defaults and an empty key list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Portal the original client was written for.
pub const DEFAULT_PORTAL: &str = "http://ip.viks.tv";

/// User configuration, all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Portal base URL. Defaults to [`DEFAULT_PORTAL`].
    pub portal: Option<String>,
    /// Site keys used by the stream URL deobfuscation.
    #[serde(default)]
    pub keys: Vec<String>,
    /// Preferred player binary name (e.g., `"mpv"`).
    pub player: Option<String>,
}

impl Config {
    /// Default config file location, `None` when the platform has no
    /// config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("teletap").join("config.toml"))
    }

    /// Load configuration from the default location.
    ///
    /// A missing file yields `Config::default()`. A file that exists but
    /// fails to parse is an error; silently ignoring a broken config
    /// hides typos in the keys list.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Portal base URL after applying the default.
    #[must_use]
    pub fn portal_url(&self) -> &str {
        self.portal.as_deref().unwrap_or(DEFAULT_PORTAL)
    }
}
