//! In-memory store, used by tests and as a scratch store

use super::state::StoreState;
use super::{ConfigStore, Items, StorageArea, StorageChange, StoreError, CHANGE_CHANNEL_CAPACITY};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

pub struct MemoryStore {
    state: Mutex<StoreState>,
    changes: broadcast::Sender<StorageChange>,
    failing_reads: AtomicBool,
    failing_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_state(StoreState::default())
    }

    pub fn with_state(state: StoreState) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(state),
            changes,
            failing_reads: AtomicBool::new(false),
            failing_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail, to exercise degraded paths
    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail_reads(unavailable);
        self.fail_writes(unavailable);
    }

    /// Make `get` fail while writes still go through
    pub fn fail_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    /// Make `set` and `remove` fail while reads still go through
    pub fn fail_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.lock().clone()
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("memory store {} switched off", operation)));
        }
        Ok(())
    }

    fn publish(&self, change: Option<StorageChange>) {
        if let Some(change) = change {
            // No subscribers is fine
            let _ = self.changes.send(change);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, area: StorageArea, keys: &[&str]) -> Result<Items, StoreError> {
        Self::check(&self.failing_reads, "reads")?;
        Ok(self.state.lock().get(area, keys))
    }

    async fn set(&self, area: StorageArea, items: Items) -> Result<(), StoreError> {
        Self::check(&self.failing_writes, "writes")?;
        let change = self.state.lock().set(area, items);
        self.publish(change);
        Ok(())
    }

    async fn remove(&self, area: StorageArea, keys: &[&str]) -> Result<(), StoreError> {
        Self::check(&self.failing_writes, "writes")?;
        let change = self.state.lock().remove(area, keys);
        self.publish(change);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
