//! Command-line host: a file-backed store and a recording browser host

pub mod interactive;
pub mod render;

use crate::icon::OfflineProbe;
use crate::options::OptionsPage;
use crate::platform::RecordingHost;
use crate::router::EventRouter;
use crate::settings::Settings;
use crate::store::{ConfigStore, JsonFileStore, StorageChange};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

pub const DEFAULT_STORE_FILE: &str = "speeddial-store.json";

pub struct Session {
    pub store: Arc<JsonFileStore>,
    pub host: Arc<RecordingHost>,
    pub router: EventRouter,
    pub options: OptionsPage,
    changes: broadcast::Receiver<StorageChange>,
}

impl Session {
    pub fn open(settings: Settings, store_path: Option<PathBuf>, offline: bool) -> Result<Self> {
        let path = store_path
            .or_else(|| settings.store_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
        let store = Arc::new(
            JsonFileStore::open(&path).with_context(|| format!("Failed to open store {}", path.display()))?,
        );
        let changes = store.subscribe();

        let host = Arc::new(RecordingHost::new());
        let options = OptionsPage::new(store.clone(), Arc::new(settings.clone()));
        let router = if offline {
            EventRouter::new(store.clone(), host.clone(), Arc::new(OfflineProbe), settings)
        } else {
            crate::connect(store.clone(), host.clone(), settings)?
        };

        Ok(Self {
            store,
            host,
            router,
            options,
            changes,
        })
    }

    /// Let the router react to everything written so far
    pub async fn settle(&mut self) -> usize {
        self.router.drain(&mut self.changes).await
    }
}
