//! Persisted key-value storage with a synced and a local area
//!
//! The store mirrors the browser storage contract: `get` returns only the keys
//! that are present, `set` merges with last-write-wins per key, and every
//! effective change is broadcast to subscribers with its old and new values.

pub mod file;
pub mod memory;
pub mod state;
pub mod typed;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use typed::{load_configuration, load_icon_state, load_left_click_url, load_links, IconState};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tokio::sync::broadcast;

pub type Items = Map<String, Value>;

/// Capacity of the change channel before slow subscribers start lagging
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    Sync,
    Local,
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageArea::Sync => write!(f, "sync"),
            StorageArea::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// The keys of one area that changed in a single write
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub area: StorageArea,
    pub changes: BTreeMap<String, ValueChange>,
}

impl StorageChange {
    pub fn touches(&self, key: &str) -> bool {
        self.changes.contains_key(key)
    }

    pub fn new_value(&self, key: &str) -> Option<&Value> {
        self.changes.get(key).and_then(|c| c.new_value.as_ref())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Present keys among `keys`; absent keys are omitted, not null-filled
    async fn get(&self, area: StorageArea, keys: &[&str]) -> Result<Items, StoreError>;

    /// Merge `items` into `area`
    async fn set(&self, area: StorageArea, items: Items) -> Result<(), StoreError>;

    async fn remove(&self, area: StorageArea, keys: &[&str]) -> Result<(), StoreError>;

    /// Change notifications for writes made after this call
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}
