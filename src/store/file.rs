//! Store persisted as a single JSON document on disk
//!
//! Layout: `{ "sync": { ... }, "local": { ... } }`. The whole document is
//! rewritten after every effective change.

use super::state::StoreState;
use super::{ConfigStore, Items, StorageArea, StorageChange, StoreError, CHANGE_CHANNEL_CAPACITY};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
    changes: broadcast::Sender<StorageChange>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or empty file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = read_state(&path)?;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        log::debug!("Opened store at {}", path.display());
        Ok(Self {
            path,
            state: Mutex::new(state),
            changes,
        })
    }

    /// Apply `update` to a copy of the state and keep the copy only once it
    /// is on disk. A failed write leaves the store untouched.
    fn commit<F>(&self, update: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoreState) -> Option<StorageChange>,
    {
        let mut state = self.state.lock();
        let mut next = state.clone();
        let Some(change) = update(&mut next) else {
            return Ok(());
        };

        self.write_document(&next)?;
        *state = next;
        drop(state);

        let _ = self.changes.send(change);
        Ok(())
    }

    fn write_document(&self, state: &StoreState) -> Result<(), StoreError> {
        let document = serde_json::to_string_pretty(state)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, document)?;
        Ok(())
    }
}

fn read_state(path: &Path) -> Result<StoreState, StoreError> {
    if !path.exists() {
        return Ok(StoreState::default());
    }

    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(StoreState::default());
    }

    Ok(serde_json::from_str(&contents)?)
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn get(&self, area: StorageArea, keys: &[&str]) -> Result<Items, StoreError> {
        Ok(self.state.lock().get(area, keys))
    }

    async fn set(&self, area: StorageArea, items: Items) -> Result<(), StoreError> {
        self.commit(|state| state.set(area, items))
    }

    async fn remove(&self, area: StorageArea, keys: &[&str]) -> Result<(), StoreError> {
        self.commit(|state| state.remove(area, keys))
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
