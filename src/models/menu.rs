//! Context-menu items shown on the action button

use regex::Regex;
use std::sync::OnceLock;

pub const SETTINGS_ITEM_ID: &str = "settings";
pub const SEPARATOR_ITEM_ID: &str = "separator";
pub const SETTINGS_TITLE: &str = "Settings";

/// Context the items are registered for
pub const ACTION_CONTEXT: &str = "action";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    Normal,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub title: Option<String>,
    pub kind: MenuItemKind,
    pub contexts: Vec<String>,
}

impl MenuItem {
    pub fn normal(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            kind: MenuItemKind::Normal,
            contexts: vec![ACTION_CONTEXT.to_string()],
        }
    }

    pub fn separator() -> Self {
        Self {
            id: SEPARATOR_ITEM_ID.to_string(),
            title: None,
            kind: MenuItemKind::Separator,
            contexts: vec![ACTION_CONTEXT.to_string()],
        }
    }
}

pub fn link_item_id(index: usize) -> String {
    format!("link-{}", index)
}

static LINK_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_link_id_regex() -> &'static Regex {
    LINK_ID_REGEX.get_or_init(|| Regex::new(r"^link-(\d+)$").unwrap())
}

/// Index embedded in a `link-<n>` item id
pub fn parse_link_index(item_id: &str) -> Option<usize> {
    get_link_id_regex()
        .captures(item_id)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("link-0", Some(0))]
    #[test_case("link-12", Some(12))]
    #[test_case("link-", None)]
    #[test_case("link-x", None)]
    #[test_case("link-1-2", None)]
    #[test_case("settings", None)]
    #[test_case("separator", None)]
    fn test_parse_link_index(id: &str, expected: Option<usize>) {
        assert_eq!(parse_link_index(id), expected);
    }

    #[test]
    fn test_link_item_id_round_trips() {
        assert_eq!(parse_link_index(&link_item_id(7)), Some(7));
    }
}
