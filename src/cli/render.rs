//! Terminal output for host state and configuration

use crate::icon::{IconOrigin, Resolution};
use crate::models::{Configuration, MenuItem, MenuItemKind};
use crate::options::OptionsDraft;
use crate::platform::{HostCall, RecordingHost};
use colored::*;

pub fn print_menu(items: &[MenuItem]) {
    println!("{}", "📋 Context menu".bold());
    if items.is_empty() {
        println!("  {}", "(empty)".dimmed());
        return;
    }

    for item in items {
        match item.kind {
            MenuItemKind::Separator => println!("  {}", "─".repeat(24).dimmed()),
            MenuItemKind::Normal => println!(
                "  {} {}",
                item.title.as_deref().unwrap_or(""),
                format!("[{}]", item.id).dimmed()
            ),
        }
    }
}

/// Everything the host was asked to do, except menu churn
pub fn print_host_activity(host: &RecordingHost) {
    for call in host.calls() {
        match call {
            HostCall::OpenTab(url) => println!("🌐 Opened tab: {}", url.cyan()),
            HostCall::OpenOptionsPage => println!("⚙️  Opened settings"),
            HostCall::SetIcon(icon) => println!("🖼️  Action icon: {}", icon.to_string().cyan()),
            HostCall::RemoveAllMenus | HostCall::CreateMenuItem(_) => {}
        }
    }
}

pub fn print_configuration(config: &Configuration, has_custom_icon: bool) {
    println!("{}", "🔧 Configuration".bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!("  Left-click URL: {}", config.left_click_url.cyan());
    println!(
        "  Force custom icon: {}",
        if config.force_custom_icon { "yes".green() } else { "no".normal() }
    );
    println!(
        "  Custom icon: {}",
        if has_custom_icon { "stored".green() } else { "none".dimmed() }
    );
    println!();
    print_links(&config.right_click_links);
}

pub fn print_draft(draft: &OptionsDraft) {
    println!("  Left-click URL: {}", draft.left_click_url.cyan());
    println!("  Force custom icon: {}", draft.force_custom_icon);
    print_links(&draft.links);
}

fn print_links(links: &[crate::models::LinkEntry]) {
    if links.is_empty() {
        println!("  {}", "No right-click links".dimmed());
        return;
    }

    println!("  Right-click links:");
    for (index, link) in links.iter().enumerate() {
        println!(
            "    {}. {} → {}",
            index.to_string().yellow(),
            link.display_title(index),
            link.url.dimmed()
        );
    }
}

pub fn print_resolution(url: &str, resolution: &Resolution) {
    let origin = match resolution.origin {
        IconOrigin::ForcedCustom => "forced custom icon".to_string(),
        IconOrigin::Cached => "icon cache".to_string(),
        IconOrigin::Probed { source_index } => format!("favicon source #{}", source_index + 1),
        IconOrigin::FallbackCustom => "custom icon (no favicon source answered)".to_string(),
        IconOrigin::Default => "built-in default".to_string(),
    };

    println!("🔍 {}", url.bold());
    println!("  Icon: {}", resolution.icon.to_string().cyan());
    println!("  From: {}", origin.dimmed());
}
