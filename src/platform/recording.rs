//! In-memory browser host that keeps the live UI state and a call log

use super::BrowserHost;
use crate::models::{IconRef, MenuItem};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetIcon(IconRef),
    RemoveAllMenus,
    CreateMenuItem(String),
    OpenTab(String),
    OpenOptionsPage,
}

#[derive(Debug, Default)]
struct HostState {
    menu: Vec<MenuItem>,
    icon: Option<IconRef>,
    calls: Vec<HostCall>,
    failing_items: HashSet<String>,
}

/// Host that behaves like the browser's menu registry: ids are unique and
/// creating an existing id fails.
#[derive(Debug, Default)]
pub struct RecordingHost {
    state: Mutex<HostState>,
    suspend_on_menu_ops: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Yield to the scheduler inside every menu operation, the way a real
    /// browser call suspends the caller
    pub fn suspending() -> Self {
        Self {
            state: Mutex::default(),
            suspend_on_menu_ops: true,
        }
    }

    /// Make creating the item `id` fail
    pub fn fail_creating(&self, id: impl Into<String>) {
        self.state.lock().failing_items.insert(id.into());
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        self.state.lock().menu.clone()
    }

    pub fn menu_ids(&self) -> Vec<String> {
        self.state.lock().menu.iter().map(|item| item.id.clone()).collect()
    }

    pub fn icon(&self) -> Option<IconRef> {
        self.state.lock().icon.clone()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    pub fn opened_tabs(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::OpenTab(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn options_page_opens(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, HostCall::OpenOptionsPage))
            .count()
    }

    pub fn count(&self, wanted: &HostCall) -> usize {
        self.state.lock().calls.iter().filter(|call| *call == wanted).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    async fn suspend(&self) {
        if self.suspend_on_menu_ops {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl BrowserHost for RecordingHost {
    async fn set_action_icon(&self, icon: &IconRef) -> Result<()> {
        let mut state = self.state.lock();
        state.icon = Some(icon.clone());
        state.calls.push(HostCall::SetIcon(icon.clone()));
        Ok(())
    }

    async fn remove_all_menus(&self) -> Result<()> {
        self.suspend().await;
        let mut state = self.state.lock();
        state.menu.clear();
        state.calls.push(HostCall::RemoveAllMenus);
        Ok(())
    }

    async fn create_menu_item(&self, item: MenuItem) -> Result<()> {
        self.suspend().await;
        let mut state = self.state.lock();
        state.calls.push(HostCall::CreateMenuItem(item.id.clone()));

        if state.failing_items.contains(&item.id) {
            anyhow::bail!("Cannot create menu item '{}'", item.id);
        }
        if state.menu.iter().any(|existing| existing.id == item.id) {
            anyhow::bail!("Cannot create item with duplicate id {}", item.id);
        }

        state.menu.push(item);
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<()> {
        self.state.lock().calls.push(HostCall::OpenTab(url.to_string()));
        Ok(())
    }

    async fn open_options_page(&self) -> Result<()> {
        self.state.lock().calls.push(HostCall::OpenOptionsPage);
        Ok(())
    }
}
