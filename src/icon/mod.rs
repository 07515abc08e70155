//! Action-button icon resolution
//!
//! Precedence: a forced custom icon, then the per-domain cache, then the first
//! favicon source that answers, then the custom icon, then the packaged
//! default. Resolution never fails.

pub mod probe;
pub mod sources;

pub use probe::{FaviconProbe, HttpProbe, OfflineProbe, ScriptedProbe};

use crate::models::{domain_of, keys, IconCache, IconRef};
use crate::platform::BrowserHost;
use crate::settings::Settings;
use crate::store::typed::{decode, single};
use crate::store::{load_icon_state, ConfigStore, StorageArea};
use std::sync::Arc;

/// Where a resolved icon came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconOrigin {
    ForcedCustom,
    Cached,
    Probed { source_index: usize },
    FallbackCustom,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub icon: IconRef,
    pub origin: IconOrigin,
}

pub struct IconResolver {
    store: Arc<dyn ConfigStore>,
    probe: Arc<dyn FaviconProbe>,
    settings: Arc<Settings>,
}

impl IconResolver {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        probe: Arc<dyn FaviconProbe>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            store,
            probe,
            settings,
        }
    }

    pub async fn resolve(&self, url: &str) -> IconRef {
        self.resolve_detailed(url).await.icon
    }

    pub async fn resolve_detailed(&self, url: &str) -> Resolution {
        let state = load_icon_state(self.store.as_ref()).await;

        if state.force_custom_icon {
            if let Some(custom) = state.custom_icon.clone() {
                return Resolution {
                    icon: custom,
                    origin: IconOrigin::ForcedCustom,
                };
            }
        }

        if let Some(domain) = domain_of(url) {
            if let Some(cached) = state.cache.get(&domain) {
                log::debug!("Using cached icon for {}", domain);
                return Resolution {
                    icon: cached.clone(),
                    origin: IconOrigin::Cached,
                };
            }

            if let Some((source_index, icon)) = self.probe_sources(&domain).await {
                self.remember(&domain, &icon).await;
                return Resolution {
                    icon,
                    origin: IconOrigin::Probed { source_index },
                };
            }
        } else {
            log::warn!("Cannot derive a domain from '{}', using fallback icon", url);
        }

        match state.custom_icon {
            Some(custom) => Resolution {
                icon: custom,
                origin: IconOrigin::FallbackCustom,
            },
            None => Resolution {
                icon: IconRef::from(self.settings.default_icon.as_str()),
                origin: IconOrigin::Default,
            },
        }
    }

    /// Resolve the icon for `url` and apply it to the action button
    pub async fn apply(&self, url: &str, host: &dyn BrowserHost) -> IconRef {
        let icon = self.resolve(url).await;
        if let Err(err) = host.set_action_icon(&icon).await {
            log::error!("Failed to set action icon to {}: {:#}", icon, err);
        }
        icon
    }

    async fn probe_sources(&self, domain: &str) -> Option<(usize, IconRef)> {
        for (index, candidate) in sources::candidate_urls(&self.settings.favicon_sources, domain).enumerate() {
            match self.probe.probe(&candidate).await {
                Ok(()) => return Some((index, IconRef::from(candidate))),
                Err(err) => log::debug!("Favicon source unavailable: {:#}", err),
            }
        }

        log::warn!("No favicon source answered for {}", domain);
        None
    }

    /// Add one cache entry. The cache is re-read first so entries written by
    /// a concurrent resolution for another domain are kept. Nothing is
    /// written when the re-read fails.
    async fn remember(&self, domain: &str, icon: &IconRef) {
        let local = match self.store.get(StorageArea::Local, &[keys::ICON_CACHE]).await {
            Ok(local) => local,
            Err(err) => {
                log::warn!("Not caching icon for {}, icon cache unreadable: {}", domain, err);
                return;
            }
        };
        let mut cache: IconCache = decode(&local, keys::ICON_CACHE).unwrap_or_default();
        cache.insert(domain, icon.clone());

        let value = match serde_json::to_value(&cache) {
            Ok(value) => value,
            Err(err) => {
                log::error!("Failed to encode icon cache: {}", err);
                return;
            }
        };

        if let Err(err) = self
            .store
            .set(StorageArea::Local, single(keys::ICON_CACHE, value))
            .await
        {
            log::warn!("Failed to cache icon for {}: {}", domain, err);
        }
    }
}
