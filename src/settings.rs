//! Runtime settings for the speed-dial core
//!
//! Settings are the runtime's own tunables, not the user's configuration.
//! They can be loaded from a JSON5 file; every field is optional there.

use crate::models::{default_links, LinkEntry, DEFAULT_ICON_PATH, DEFAULT_LEFT_CLICK_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Favicon sources probed in order; `{domain}` is replaced by the hostname
pub const DEFAULT_FAVICON_SOURCES: &[&str] = &[
    "https://www.google.com/s2/favicons?domain={domain}&sz=32",
    "https://{domain}/favicon.ico",
    "https://icons.duckduckgo.com/ip3/{domain}.ico",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_left_click_url: String,
    pub default_links: Vec<LinkEntry>,
    pub favicon_sources: Vec<String>,
    pub default_icon: String,
    pub probe_timeout_secs: u64,
    pub user_agent: String,
    /// Delay before the install-time menu build
    pub install_settle_ms: u64,
    /// Delay before rebuilding after the link list changed
    pub links_changed_settle_ms: u64,
    /// Directory searched for `links*.json` at install time
    pub resource_dir: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub max_custom_icon_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_left_click_url: DEFAULT_LEFT_CLICK_URL.to_string(),
            default_links: default_links(),
            favicon_sources: DEFAULT_FAVICON_SOURCES.iter().map(|s| s.to_string()).collect(),
            default_icon: DEFAULT_ICON_PATH.to_string(),
            probe_timeout_secs: 10,
            user_agent: format!("speeddial/{}", env!("CARGO_PKG_VERSION")),
            install_settle_ms: 100,
            links_changed_settle_ms: 50,
            resource_dir: None,
            store_path: None,
            max_custom_icon_bytes: 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn install_settle(&self) -> Duration {
        Duration::from_millis(self.install_settle_ms)
    }

    pub fn links_changed_settle(&self) -> Duration {
        Duration::from_millis(self.links_changed_settle_ms)
    }

    /// Settings with no settle delays, for tests and one-shot commands
    pub fn immediate() -> Self {
        Self {
            install_settle_ms: 0,
            links_changed_settle_ms: 0,
            ..Self::default()
        }
    }
}

/// Parse settings from JSON5 text
pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = json5::from_str(content).context("Failed to parse settings")?;

    if settings.favicon_sources.iter().any(|s| !s.contains("{domain}")) {
        anyhow::bail!("Every favicon source must contain a {{domain}} placeholder");
    }

    Ok(settings)
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    parse_settings(&content)
}
