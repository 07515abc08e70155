//! Interactive options editor

use super::render::print_draft;
use super::Session;
use crate::options::{validate_url, LinkField, OptionsDraft};
use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::PathBuf;

fn print_banner() {
    println!("{}", "╔═══════════════════════════════════════════════╗".blue());
    println!("{}", "║     ⚡ Speed Dial Settings                     ║".blue().bold());
    println!("{}", "╚═══════════════════════════════════════════════╝".blue());
}

fn pick_link(draft: &OptionsDraft, prompt: &str) -> Result<Option<usize>> {
    if draft.links.is_empty() {
        println!("{}", "No links yet.".yellow());
        return Ok(None);
    }

    let items: Vec<String> = draft
        .links
        .iter()
        .enumerate()
        .map(|(index, link)| format!("{} ({})", link.display_title(index), link.url))
        .collect();

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(Some(index))
}

fn prompt_link(draft: &mut OptionsDraft, index: usize) -> Result<()> {
    let current = draft.links[index].clone();

    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Link name")
        .with_initial_text(current.title)
        .allow_empty(true)
        .interact_text()?;
    let url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("URL")
        .with_initial_text(current.url)
        .interact_text()?;

    draft.update_link(index, LinkField::Title, title)?;
    draft.update_link(index, LinkField::Url, url)?;
    Ok(())
}

/// Edit the stored configuration until the user saves or quits
pub async fn run_options_editor(session: &mut Session) -> Result<()> {
    print_banner();
    let mut draft = session.options.load().await;

    loop {
        println!();
        print_draft(&draft);
        println!();

        let actions = vec![
            "🔗 Set left-click URL",
            "➕ Add link",
            "✏️  Edit link",
            "🗑️  Remove link",
            "🖼️  Toggle force custom icon",
            "📥 Import custom icon",
            "📂 Import links file",
            "💾 Save",
            "❌ Quit without saving",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&actions)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let url: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Left-click URL")
                    .with_initial_text(draft.left_click_url.clone())
                    .validate_with(|input: &String| validate_url(input).map_err(|e| e.to_string()))
                    .interact_text()?;
                draft.left_click_url = url;
            }
            1 => {
                draft.add_link();
                let index = draft.links.len() - 1;
                prompt_link(&mut draft, index)?;
            }
            2 => {
                if let Some(index) = pick_link(&draft, "Edit which link?")? {
                    prompt_link(&mut draft, index)?;
                }
            }
            3 => {
                if let Some(index) = pick_link(&draft, "Remove which link?")? {
                    let removed = draft.remove_link(index)?;
                    println!("Removed {}", removed.display_title(index).yellow());
                }
            }
            4 => {
                draft.force_custom_icon = !draft.force_custom_icon;
            }
            5 => {
                let path: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Icon file")
                    .interact_text()?;
                // Icons are stored immediately, like the file picker on the page
                match session.options.import_custom_icon_file(&PathBuf::from(path)).await {
                    Ok(_) => println!("{}", "✅ Custom icon imported".green()),
                    Err(err) => println!("{}", format!("❌ {}", err).red()),
                }
            }
            6 => {
                let path: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Links file")
                    .with_initial_text("./links.json")
                    .interact_text()?;
                match session.options.import_links(&mut draft, &PathBuf::from(path)) {
                    Ok(()) => println!("{}", "✅ Links loaded (not saved yet)".green()),
                    Err(err) => println!("{}", format!("❌ {}", err).red()),
                }
            }
            7 => {
                match session.options.save(&draft).await {
                    Ok(()) => {
                        println!("{}", "✅ Settings saved successfully!".green().bold());
                        session.settle().await;
                        break;
                    }
                    Err(err) => println!("{}", format!("❌ {}", err).red()),
                }
            }
            8 => {
                let discard = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt("Discard unsaved changes?")
                    .default(false)
                    .interact()?;
                if discard {
                    break;
                }
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}
