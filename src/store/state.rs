//! Merge and diff logic shared by the store implementations

use super::{Items, StorageArea, StorageChange, ValueChange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub sync: Items,
    #[serde(default)]
    pub local: Items,
}

impl StoreState {
    fn area(&self, area: StorageArea) -> &Items {
        match area {
            StorageArea::Sync => &self.sync,
            StorageArea::Local => &self.local,
        }
    }

    fn area_mut(&mut self, area: StorageArea) -> &mut Items {
        match area {
            StorageArea::Sync => &mut self.sync,
            StorageArea::Local => &mut self.local,
        }
    }

    pub fn get(&self, area: StorageArea, keys: &[&str]) -> Items {
        let items = self.area(area);
        keys.iter()
            .filter_map(|key| items.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect()
    }

    /// Merge `items`; returns the change to broadcast, if anything changed
    pub fn set(&mut self, area: StorageArea, items: Items) -> Option<StorageChange> {
        let target = self.area_mut(area);
        let mut changes = BTreeMap::new();

        for (key, value) in items {
            let old_value = target.get(&key).cloned();
            if old_value.as_ref() == Some(&value) {
                continue;
            }
            changes.insert(
                key.clone(),
                ValueChange {
                    old_value,
                    new_value: Some(value.clone()),
                },
            );
            target.insert(key, value);
        }

        (!changes.is_empty()).then_some(StorageChange { area, changes })
    }

    pub fn remove(&mut self, area: StorageArea, keys: &[&str]) -> Option<StorageChange> {
        let target = self.area_mut(area);
        let mut changes = BTreeMap::new();

        for key in keys {
            if let Some(old) = target.remove(*key) {
                changes.insert(
                    key.to_string(),
                    ValueChange {
                        old_value: Some(old),
                        new_value: None,
                    },
                );
            }
        }

        (!changes.is_empty()).then_some(StorageChange { area, changes })
    }
}
