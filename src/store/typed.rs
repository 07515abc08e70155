//! Typed reads over the raw store, with defaults applied
//!
//! Storage failures and malformed values are logged and treated as absent
//! keys. None of these helpers fail.

use super::{ConfigStore, Items, StorageArea};
use crate::models::{keys, Configuration, IconCache, IconRef, LinkEntry};
use crate::settings::Settings;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Local-area state the icon resolver consults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconState {
    pub force_custom_icon: bool,
    pub custom_icon: Option<IconRef>,
    pub cache: IconCache,
}

pub(crate) async fn get_or_empty(store: &dyn ConfigStore, area: StorageArea, keys: &[&str]) -> Items {
    match store.get(area, keys).await {
        Ok(items) => items,
        Err(err) => {
            log::warn!("Reading {:?} from {} storage failed, using defaults: {}", keys, area, err);
            Items::new()
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(items: &Items, key: &str) -> Option<T> {
    let value = items.get(key)?;
    if value.is_null() {
        return None;
    }

    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            log::warn!("Ignoring malformed stored value for '{}': {}", key, err);
            None
        }
    }
}

/// Stored left-click URL, if one is set and non-empty
pub async fn load_left_click_url(store: &dyn ConfigStore) -> Option<String> {
    let items = get_or_empty(store, StorageArea::Sync, &[keys::LEFT_CLICK_URL]).await;
    decode::<String>(&items, keys::LEFT_CLICK_URL).filter(|url| !url.is_empty())
}

/// Stored link list, or `defaults` when absent. A stored empty list is kept.
pub async fn load_links(store: &dyn ConfigStore, defaults: &[LinkEntry]) -> Vec<LinkEntry> {
    let items = get_or_empty(store, StorageArea::Sync, &[keys::RIGHT_CLICK_LINKS]).await;
    decode(&items, keys::RIGHT_CLICK_LINKS).unwrap_or_else(|| defaults.to_vec())
}

pub async fn load_configuration(store: &dyn ConfigStore, settings: &Settings) -> Configuration {
    let items = get_or_empty(
        store,
        StorageArea::Sync,
        &[keys::LEFT_CLICK_URL, keys::RIGHT_CLICK_LINKS, keys::FORCE_CUSTOM_ICON],
    )
    .await;

    Configuration {
        left_click_url: decode::<String>(&items, keys::LEFT_CLICK_URL)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| settings.default_left_click_url.clone()),
        right_click_links: decode(&items, keys::RIGHT_CLICK_LINKS)
            .unwrap_or_else(|| settings.default_links.clone()),
        force_custom_icon: decode(&items, keys::FORCE_CUSTOM_ICON).unwrap_or(false),
    }
}

pub async fn load_icon_state(store: &dyn ConfigStore) -> IconState {
    let sync = get_or_empty(store, StorageArea::Sync, &[keys::FORCE_CUSTOM_ICON]).await;
    let local = get_or_empty(store, StorageArea::Local, &[keys::CUSTOM_ICON, keys::ICON_CACHE]).await;

    IconState {
        force_custom_icon: decode(&sync, keys::FORCE_CUSTOM_ICON).unwrap_or(false),
        custom_icon: decode::<String>(&local, keys::CUSTOM_ICON)
            .filter(|icon| !icon.is_empty())
            .map(IconRef::from),
        cache: decode(&local, keys::ICON_CACHE).unwrap_or_default(),
    }
}

pub(crate) fn single(key: &str, value: Value) -> Items {
    let mut items = Items::new();
    items.insert(key.to_string(), value);
    items
}
