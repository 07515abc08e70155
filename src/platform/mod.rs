//! Browser surfaces the core drives: action icon, context menu, tabs

pub mod recording;

pub use recording::{HostCall, RecordingHost};

use crate::models::{IconRef, MenuItem};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BrowserHost: Send + Sync {
    async fn set_action_icon(&self, icon: &IconRef) -> Result<()>;

    /// Remove every context-menu item this extension created
    async fn remove_all_menus(&self) -> Result<()>;

    async fn create_menu_item(&self, item: MenuItem) -> Result<()>;

    async fn open_tab(&self, url: &str) -> Result<()>;

    async fn open_options_page(&self) -> Result<()>;
}
