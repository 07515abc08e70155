//! Optional link-list document shipped next to the extension
//!
//! Several copies may exist when the document was downloaded more than once
//! (`links.json`, `links (1).json`, ...). The highest-numbered copy is the
//! newest and wins.

use crate::models::LinkEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest `links (N).json` suffix looked for
pub const MAX_NUMBERED_COPY: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkEntry>>,
}

/// Filenames to try, highest priority first
pub fn candidate_filenames() -> Vec<String> {
    let mut names: Vec<String> = (1..=MAX_NUMBERED_COPY)
        .rev()
        .map(|n| format!("links ({}).json", n))
        .collect();
    names.push("links.json".to_string());
    names
}

pub fn parse_links_document(content: &str) -> Result<LinksDocument> {
    json5::from_str(content).context("Failed to parse links document")
}

pub fn read_links_document(path: &Path) -> Result<LinksDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_links_document(&content)
}

/// First candidate in `dir` that exists and parses
pub fn load_links_document(dir: &Path) -> Option<(PathBuf, LinksDocument)> {
    for name in candidate_filenames() {
        let path = dir.join(&name);
        if !path.is_file() {
            continue;
        }

        match read_links_document(&path) {
            Ok(document) => {
                log::debug!("Loaded links document {}", path.display());
                return Some((path, document));
            }
            Err(err) => log::warn!("Skipping {}: {:#}", path.display(), err),
        }
    }
    None
}
