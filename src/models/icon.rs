//! Icon references and the per-domain favicon cache

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Packaged icon used when nothing better is available
pub const DEFAULT_ICON_PATH: &str = "icon.png";

/// Something the host can apply as the action button's icon.
///
/// Stored as a plain string; the variant is recovered from its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconRef {
    /// A remote favicon URL
    Remote(String),
    /// An embedded `data:` URI
    Embedded(String),
    /// A path to a resource packaged with the extension
    Packaged(String),
}

impl IconRef {
    pub fn as_str(&self) -> &str {
        match self {
            IconRef::Remote(s) | IconRef::Embedded(s) | IconRef::Packaged(s) => s,
        }
    }

    pub fn default_icon() -> Self {
        IconRef::Packaged(DEFAULT_ICON_PATH.to_string())
    }
}

impl From<String> for IconRef {
    fn from(value: String) -> Self {
        if value.starts_with("data:") {
            IconRef::Embedded(value)
        } else if value.starts_with("http://") || value.starts_with("https://") {
            IconRef::Remote(value)
        } else {
            IconRef::Packaged(value)
        }
    }
}

impl From<&str> for IconRef {
    fn from(value: &str) -> Self {
        IconRef::from(value.to_string())
    }
}

impl From<IconRef> for String {
    fn from(value: IconRef) -> Self {
        match value {
            IconRef::Remote(s) | IconRef::Embedded(s) | IconRef::Packaged(s) => s,
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // data URIs can be megabytes long
            IconRef::Embedded(s) => {
                let head: String = s.chars().take(32).collect();
                write!(f, "{}... ({} bytes)", head, s.len())
            }
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Domain -> resolved favicon. Entries are never evicted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconCache(BTreeMap<String, IconRef>);

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str) -> Option<&IconRef> {
        self.0.get(domain)
    }

    pub fn insert(&mut self, domain: impl Into<String>, icon: IconRef) {
        self.0.insert(domain.into(), icon);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Hostname of `url`, or `None` when it does not parse or has no host
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}
