//! Event dispatch from host notifications to the icon resolver and menu builder

use crate::bootstrap::bootstrap;
use crate::icon::{FaviconProbe, IconResolver};
use crate::menu::{ClickOutcome, MenuBuilder, RebuildOutcome};
use crate::models::{keys, IconRef};
use crate::platform::BrowserHost;
use crate::settings::Settings;
use crate::store::{load_configuration, load_left_click_url, ConfigStore, StorageArea, StorageChange};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Installed,
    Startup,
    ActionClicked,
    MenuClicked(String),
    StorageChanged(StorageChange),
}

/// Cheap to clone; clones share the same resolver, builder and rebuild guard
#[derive(Clone)]
pub struct EventRouter {
    store: Arc<dyn ConfigStore>,
    host: Arc<dyn BrowserHost>,
    settings: Arc<Settings>,
    icons: Arc<IconResolver>,
    menus: Arc<MenuBuilder>,
}

impl EventRouter {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        host: Arc<dyn BrowserHost>,
        probe: Arc<dyn FaviconProbe>,
        settings: Settings,
    ) -> Self {
        let settings = Arc::new(settings);
        let icons = Arc::new(IconResolver::new(store.clone(), probe, settings.clone()));
        let menus = Arc::new(MenuBuilder::new(store.clone(), host.clone(), settings.clone()));

        Self {
            store,
            host,
            settings,
            icons,
            menus,
        }
    }

    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    pub fn menus(&self) -> &MenuBuilder {
        &self.menus
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn dispatch(&self, event: Event) {
        match event {
            Event::Installed => self.on_install().await,
            Event::Startup => self.on_startup().await,
            Event::ActionClicked => {
                self.on_action_clicked().await;
            }
            Event::MenuClicked(item_id) => {
                self.on_menu_clicked(&item_id).await;
            }
            Event::StorageChanged(change) => self.on_storage_changed(&change).await,
        }
    }

    pub async fn on_install(&self) {
        let url = match bootstrap(self.store.as_ref(), &self.settings).await {
            Ok(url) => url,
            Err(err) => {
                log::error!("Failed to initialize configuration: {:#}", err);
                self.settings.default_left_click_url.clone()
            }
        };

        futures::future::join(
            self.settled_rebuild(self.settings.install_settle()),
            self.icons.apply(&url, self.host.as_ref()),
        )
        .await;
    }

    pub async fn on_startup(&self) {
        if let Some(url) = load_left_click_url(self.store.as_ref()).await {
            self.icons.apply(&url, self.host.as_ref()).await;
        }
        self.menus.rebuild_from_store().await;
    }

    /// Open the left-click URL and refresh the icon. Returns the opened URL.
    pub async fn on_action_clicked(&self) -> String {
        let url = self.left_click_url_or_default().await;

        if let Err(err) = self.host.open_tab(&url).await {
            log::error!("Failed to open {}: {:#}", url, err);
        }
        self.icons.apply(&url, self.host.as_ref()).await;
        url
    }

    pub async fn on_menu_clicked(&self, item_id: &str) -> ClickOutcome {
        self.menus.on_click(item_id).await
    }

    pub async fn on_storage_changed(&self, change: &StorageChange) {
        match change.area {
            StorageArea::Sync => {
                if change.touches(keys::RIGHT_CLICK_LINKS) {
                    self.settled_rebuild(self.settings.links_changed_settle()).await;
                }

                if change.touches(keys::LEFT_CLICK_URL) {
                    let url = change
                        .new_value(keys::LEFT_CLICK_URL)
                        .and_then(|v| v.as_str())
                        .filter(|url| !url.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| self.settings.default_left_click_url.clone());
                    self.icons.apply(&url, self.host.as_ref()).await;
                }

                if change.touches(keys::FORCE_CUSTOM_ICON) {
                    self.refresh_icon().await;
                }
            }
            StorageArea::Local => {
                if change.touches(keys::CUSTOM_ICON) {
                    let config = load_configuration(self.store.as_ref(), &self.settings).await;
                    if config.force_custom_icon {
                        self.icons.apply(&config.left_click_url, self.host.as_ref()).await;
                    }
                }
            }
        }
    }

    /// Re-apply the icon for the stored left-click URL
    pub async fn refresh_icon(&self) -> IconRef {
        let url = self.left_click_url_or_default().await;
        self.icons.apply(&url, self.host.as_ref()).await
    }

    /// Consume change notifications until the channel closes. Each change is
    /// handled on its own task, so handlers may interleave.
    pub async fn run(&self, mut changes: broadcast::Receiver<StorageChange>) {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    let router = self.clone();
                    tokio::spawn(async move { router.on_storage_changed(&change).await });
                }
                Err(RecvError::Lagged(missed)) => {
                    log::warn!("Missed {} storage changes, resynchronising", missed);
                    let router = self.clone();
                    tokio::spawn(async move { router.resync().await });
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Handle every change already queued, one after another. Returns how many
    /// were handled.
    pub async fn drain(&self, changes: &mut broadcast::Receiver<StorageChange>) -> usize {
        let mut handled = 0;
        loop {
            match changes.try_recv() {
                Ok(change) => {
                    self.on_storage_changed(&change).await;
                    handled += 1;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    log::warn!("Missed {} storage changes, resynchronising", missed);
                    self.resync().await;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return handled,
            }
        }
    }

    async fn resync(&self) {
        self.menus.rebuild_from_store().await;
        self.refresh_icon().await;
    }

    async fn settled_rebuild(&self, settle: Duration) -> RebuildOutcome {
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
        self.menus.rebuild_from_store().await
    }

    async fn left_click_url_or_default(&self) -> String {
        load_left_click_url(self.store.as_ref())
            .await
            .unwrap_or_else(|| self.settings.default_left_click_url.clone())
    }
}
