//! Configuration shapes stored in the synced storage area

use serde::{Deserialize, Serialize};

pub const DEFAULT_LEFT_CLICK_URL: &str = "https://www.bing.com";

/// Storage keys, named exactly as they are persisted
pub mod keys {
    pub const LEFT_CLICK_URL: &str = "leftClickUrl";
    pub const RIGHT_CLICK_LINKS: &str = "rightClickLinks";
    pub const FORCE_CUSTOM_ICON: &str = "forceCustomIcon";
    pub const CUSTOM_ICON: &str = "customIcon";
    pub const ICON_CACHE: &str = "iconCache";
}

/// One right-click shortcut
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl LinkEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Title shown in the menu. Empty titles fall back to the 1-based position.
    pub fn display_title(&self, index: usize) -> String {
        if self.title.is_empty() {
            format!("Link {}", index + 1)
        } else {
            self.title.clone()
        }
    }
}

pub fn default_links() -> Vec<LinkEntry> {
    vec![LinkEntry::new("Google", "https://www.google.com")]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub left_click_url: String,
    pub right_click_links: Vec<LinkEntry>,
    #[serde(default)]
    pub force_custom_icon: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            left_click_url: DEFAULT_LEFT_CLICK_URL.to_string(),
            right_click_links: default_links(),
            force_custom_icon: false,
        }
    }
}
