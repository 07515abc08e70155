//! Speed-dial action button
//!
//! Left-click opens a configured URL, right-click shows a menu of shortcut
//! links, and the action icon follows the left-click URL's favicon. The
//! browser, the persisted storage and the network are injected, so the same
//! core runs inside a real host or against the in-memory doubles.

pub mod models;
pub mod settings;
pub mod store;
pub mod platform;
pub mod icon;
pub mod menu;
pub mod bootstrap;
pub mod options;
pub mod router;
#[cfg(feature = "cli")]
pub mod cli;

pub use models::{Configuration, IconRef, LinkEntry, MenuItem};
pub use settings::Settings;
pub use store::{ConfigStore, JsonFileStore, MemoryStore};
pub use platform::{BrowserHost, RecordingHost};
pub use icon::{FaviconProbe, HttpProbe, IconResolver};
pub use menu::MenuBuilder;
pub use router::{Event, EventRouter};

use std::sync::Arc;

/// Wire a router over `store` and `host` that probes favicons over HTTP
pub fn connect(
    store: Arc<dyn ConfigStore>,
    host: Arc<dyn BrowserHost>,
    settings: Settings,
) -> anyhow::Result<EventRouter> {
    let probe = Arc::new(HttpProbe::new(&settings)?);
    Ok(EventRouter::new(store, host, probe, settings))
}
