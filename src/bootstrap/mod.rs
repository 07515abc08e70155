//! Install-time configuration seeding

pub mod links_file;

pub use links_file::{candidate_filenames, load_links_document, parse_links_document, LinksDocument};

use crate::models::{keys, LinkEntry};
use crate::settings::Settings;
use crate::store::typed::decode;
use crate::store::{ConfigStore, Items, StorageArea};
use anyhow::{Context, Result};
use serde_json::Value;

/// Values used when nothing is stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub url: String,
    pub links: Vec<LinkEntry>,
}

/// Seed from the resource directory's links document, or the defaults
pub fn seed(settings: &Settings) -> Seed {
    let document = settings
        .resource_dir
        .as_deref()
        .and_then(load_links_document)
        .map(|(_, document)| document)
        .unwrap_or_default();

    Seed {
        url: document
            .url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| settings.default_left_click_url.clone()),
        links: document.links.unwrap_or_else(|| settings.default_links.clone()),
    }
}

/// Fill in missing settings without touching values the user already has.
/// Returns the effective left-click URL.
pub async fn bootstrap(store: &dyn ConfigStore, settings: &Settings) -> Result<String> {
    let seed = seed(settings);
    // Without the stored values the defaults would overwrite them
    let stored = store
        .get(StorageArea::Sync, &[keys::LEFT_CLICK_URL, keys::RIGHT_CLICK_LINKS])
        .await
        .context("Failed to read stored configuration")?;

    let url = decode::<String>(&stored, keys::LEFT_CLICK_URL)
        .filter(|url| !url.is_empty())
        .unwrap_or(seed.url);
    let links = decode::<Vec<LinkEntry>>(&stored, keys::RIGHT_CLICK_LINKS).unwrap_or(seed.links);

    let mut items = Items::new();
    items.insert(keys::LEFT_CLICK_URL.to_string(), Value::String(url.clone()));
    items.insert(
        keys::RIGHT_CLICK_LINKS.to_string(),
        serde_json::to_value(&links).context("Failed to encode link list")?,
    );
    store
        .set(StorageArea::Sync, items)
        .await
        .context("Failed to store initial configuration")?;

    log::info!("Configuration initialised with {} links", links.len());
    Ok(url)
}
