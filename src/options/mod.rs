//! Options surface
//!
//! The options page never talks to the core directly. It edits a draft and
//! writes it back through the store; the router picks the change up.

pub mod custom_icon;

pub use custom_icon::{encode_custom_icon, sniff_image_type};

use crate::bootstrap::{parse_links_document, LinksDocument};
use crate::models::{keys, IconRef, LinkEntry};
use crate::settings::Settings;
use crate::store::typed::{decode, get_or_empty, single};
use crate::store::{ConfigStore, Items, StorageArea, StoreError};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("icon file is empty")]
    EmptyIcon,

    #[error("icon is {size} bytes, the limit is {max} bytes")]
    IconTooLarge { size: usize, max: usize },

    #[error("unsupported icon type: {0}")]
    UnsupportedIconType(String),

    #[error("no link at position {index} (there are {len})")]
    LinkIndexOutOfRange { index: usize, len: usize },

    #[error("'{url}' is not a valid absolute URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("links document is invalid: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Title,
    Url,
}

/// Editable copy of the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsDraft {
    pub left_click_url: String,
    pub links: Vec<LinkEntry>,
    pub force_custom_icon: bool,
    pub has_custom_icon: bool,
}

impl OptionsDraft {
    pub fn add_link(&mut self) {
        self.links.push(LinkEntry::default());
    }

    pub fn remove_link(&mut self, index: usize) -> Result<LinkEntry, OptionsError> {
        self.check_index(index)?;
        Ok(self.links.remove(index))
    }

    pub fn update_link(&mut self, index: usize, field: LinkField, value: impl Into<String>) -> Result<(), OptionsError> {
        self.check_index(index)?;
        let link = &mut self.links[index];
        match field {
            LinkField::Title => link.title = value.into(),
            LinkField::Url => link.url = value.into(),
        }
        Ok(())
    }

    pub fn to_document(&self) -> LinksDocument {
        LinksDocument {
            url: Some(self.left_click_url.clone()),
            links: Some(self.links.clone()),
        }
    }

    /// Replace url and links with those in `document`; absent fields are kept
    pub fn apply_document(&mut self, document: LinksDocument) {
        if let Some(url) = document.url.filter(|url| !url.is_empty()) {
            self.left_click_url = url;
        }
        if let Some(links) = document.links {
            self.links = links;
        }
    }

    fn check_index(&self, index: usize) -> Result<(), OptionsError> {
        if index >= self.links.len() {
            return Err(OptionsError::LinkIndexOutOfRange {
                index,
                len: self.links.len(),
            });
        }
        Ok(())
    }
}

pub fn validate_url(url: &str) -> Result<(), OptionsError> {
    Url::parse(url).map(|_| ()).map_err(|err| OptionsError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })
}

pub struct OptionsPage {
    store: Arc<dyn ConfigStore>,
    settings: Arc<Settings>,
}

impl OptionsPage {
    pub fn new(store: Arc<dyn ConfigStore>, settings: Arc<Settings>) -> Self {
        Self { store, settings }
    }

    pub async fn load(&self) -> OptionsDraft {
        let sync = get_or_empty(
            self.store.as_ref(),
            StorageArea::Sync,
            &[keys::LEFT_CLICK_URL, keys::RIGHT_CLICK_LINKS, keys::FORCE_CUSTOM_ICON],
        )
        .await;
        let local = get_or_empty(self.store.as_ref(), StorageArea::Local, &[keys::CUSTOM_ICON]).await;

        OptionsDraft {
            left_click_url: decode::<String>(&sync, keys::LEFT_CLICK_URL)
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| self.settings.default_left_click_url.clone()),
            // the form shows no placeholder links
            links: decode(&sync, keys::RIGHT_CLICK_LINKS).unwrap_or_default(),
            force_custom_icon: decode(&sync, keys::FORCE_CUSTOM_ICON).unwrap_or(false),
            has_custom_icon: decode::<String>(&local, keys::CUSTOM_ICON).is_some_and(|icon| !icon.is_empty()),
        }
    }

    pub async fn save(&self, draft: &OptionsDraft) -> Result<(), OptionsError> {
        validate_url(&draft.left_click_url)?;

        let mut items = Items::new();
        items.insert(keys::LEFT_CLICK_URL.to_string(), Value::String(draft.left_click_url.clone()));
        items.insert(keys::RIGHT_CLICK_LINKS.to_string(), serde_json::to_value(&draft.links)?);
        items.insert(keys::FORCE_CUSTOM_ICON.to_string(), Value::Bool(draft.force_custom_icon));
        self.store.set(StorageArea::Sync, items).await?;

        log::info!("Settings saved");
        Ok(())
    }

    pub async fn set_force_custom_icon(&self, force: bool) -> Result<(), OptionsError> {
        self.store
            .set(StorageArea::Sync, single(keys::FORCE_CUSTOM_ICON, Value::Bool(force)))
            .await?;
        Ok(())
    }

    pub async fn import_custom_icon(&self, bytes: &[u8]) -> Result<IconRef, OptionsError> {
        let icon = encode_custom_icon(bytes, self.settings.max_custom_icon_bytes)?;
        self.store
            .set(
                StorageArea::Local,
                single(keys::CUSTOM_ICON, Value::String(icon.as_str().to_string())),
            )
            .await?;
        Ok(icon)
    }

    pub async fn import_custom_icon_file(&self, path: &Path) -> Result<IconRef, OptionsError> {
        let bytes = std::fs::read(path)?;
        self.import_custom_icon(&bytes).await
    }

    pub async fn clear_custom_icon(&self) -> Result<(), OptionsError> {
        self.store.remove(StorageArea::Local, &[keys::CUSTOM_ICON]).await?;
        Ok(())
    }

    /// Write the draft's url and links in the install-time document format
    pub fn export_links(&self, draft: &OptionsDraft, path: &Path) -> Result<(), OptionsError> {
        let content = serde_json::to_string_pretty(&draft.to_document())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a links document into the draft. Nothing is saved until `save`.
    pub fn import_links(&self, draft: &mut OptionsDraft, path: &Path) -> Result<(), OptionsError> {
        let content = std::fs::read_to_string(path)?;
        let document =
            parse_links_document(&content).map_err(|err| OptionsError::InvalidDocument(format!("{:#}", err)))?;
        draft.apply_document(document);
        Ok(())
    }
}
