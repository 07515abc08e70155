//! Context-menu rebuilds and click dispatch
//!
//! A rebuild always removes the whole tree and recreates it from the link
//! list. Only one rebuild runs at a time; requests arriving while one is in
//! flight are dropped and the next configuration change reconverges the tree.

pub mod guard;

pub use guard::{RebuildGuard, RebuildPermit};

use crate::models::{
    link_item_id, parse_link_index, LinkEntry, MenuItem, SETTINGS_ITEM_ID, SETTINGS_TITLE,
};
use crate::platform::BrowserHost;
use crate::settings::Settings;
use crate::store::{load_links, ConfigStore};
use anyhow::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    Completed,
    /// Another rebuild was in flight
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    OpenedOptions,
    OpenedLink { index: usize, url: String },
    Ignored,
}

/// Items for `links`, in display order
pub fn menu_items(links: &[LinkEntry]) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = links
        .iter()
        .enumerate()
        .map(|(index, link)| MenuItem::normal(link_item_id(index), link.display_title(index)))
        .collect();

    if !links.is_empty() {
        items.push(MenuItem::separator());
    }
    items.push(MenuItem::normal(SETTINGS_ITEM_ID, SETTINGS_TITLE));

    items
}

pub struct MenuBuilder {
    store: Arc<dyn ConfigStore>,
    host: Arc<dyn BrowserHost>,
    settings: Arc<Settings>,
    guard: RebuildGuard,
}

impl MenuBuilder {
    pub fn new(store: Arc<dyn ConfigStore>, host: Arc<dyn BrowserHost>, settings: Arc<Settings>) -> Self {
        Self {
            store,
            host,
            settings,
            guard: RebuildGuard::new(),
        }
    }

    pub fn is_rebuilding(&self) -> bool {
        self.guard.is_busy()
    }

    pub async fn rebuild(&self, links: &[LinkEntry]) -> RebuildOutcome {
        let Some(permit) = self.guard.try_acquire() else {
            log::debug!("Menu rebuild already in flight, dropping request");
            return RebuildOutcome::Dropped;
        };

        self.build(links, permit).await
    }

    /// Rebuild from the stored link list, read after the guard is taken
    pub async fn rebuild_from_store(&self) -> RebuildOutcome {
        let Some(permit) = self.guard.try_acquire() else {
            log::debug!("Menu rebuild already in flight, dropping request");
            return RebuildOutcome::Dropped;
        };

        let links = load_links(self.store.as_ref(), &self.settings.default_links).await;
        self.build(&links, permit).await
    }

    async fn build(&self, links: &[LinkEntry], _permit: RebuildPermit) -> RebuildOutcome {
        if let Err(err) = self.replace_tree(links).await {
            log::error!("Failed to create context menus: {:#}", err);
        }
        RebuildOutcome::Completed
    }

    async fn replace_tree(&self, links: &[LinkEntry]) -> Result<()> {
        self.host.remove_all_menus().await?;

        for item in menu_items(links) {
            self.host.create_menu_item(item).await?;
        }

        log::debug!("Context menu rebuilt with {} links", links.len());
        Ok(())
    }

    pub async fn on_click(&self, item_id: &str) -> ClickOutcome {
        if item_id == SETTINGS_ITEM_ID {
            if let Err(err) = self.host.open_options_page().await {
                log::error!("Failed to open options page: {:#}", err);
            }
            return ClickOutcome::OpenedOptions;
        }

        let Some(index) = parse_link_index(item_id) else {
            return ClickOutcome::Ignored;
        };

        // The menu may predate the current list
        let links = load_links(self.store.as_ref(), &self.settings.default_links).await;
        let Some(link) = links.get(index) else {
            log::debug!("Menu item {} no longer has a link", item_id);
            return ClickOutcome::Ignored;
        };

        if let Err(err) = self.host.open_tab(&link.url).await {
            log::error!("Failed to open {}: {:#}", link.url, err);
        }
        ClickOutcome::OpenedLink {
            index,
            url: link.url.clone(),
        }
    }
}
