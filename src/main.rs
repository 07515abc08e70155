//! Speed Dial CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use speeddial::cli::{interactive, render, Session};
use speeddial::menu::ClickOutcome;
use speeddial::models::LinkEntry;
use speeddial::settings::{load_settings, Settings};
use speeddial::store::load_configuration;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "speeddial")]
#[command(about = "Speed-dial button: left-click URL, right-click shortcut menu", long_about = None)]
#[command(version)]
struct Cli {
    /// Store file holding the synced and local settings
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Runtime settings file (JSON5)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Never probe favicon sources over the network
    #[arg(long, global = true)]
    offline: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the install handler: seed settings, build the menu, set the icon
    Install {
        /// Directory searched for links*.json
        #[arg(long)]
        resources: Option<PathBuf>,
    },

    /// Run the browser-startup handler
    Startup,

    /// Left-click the action button
    Click,

    /// Rebuild and print the context menu
    Menu,

    /// Click a context-menu item by id (e.g. link-0, settings)
    MenuClick { id: String },

    /// Resolve the action icon for a URL (default: the left-click URL)
    ResolveIcon { url: Option<String> },

    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the custom icon
    Icon {
        #[command(subcommand)]
        action: IconAction,
    },

    /// Import or export the link list
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Edit the settings interactively
    Options,
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    SetUrl { url: String },
    AddLink { title: String, url: String },
    RemoveLink { index: usize },
    ForceIcon {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand)]
enum IconAction {
    Import { file: PathBuf },
    Clear,
}

#[derive(Subcommand)]
enum LinksAction {
    Export { file: PathBuf },
    Import { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to initialize async runtime");

    if let Err(err) = runtime.block_on(run(cli)) {
        eprintln!("{}", "❌ Command failed!".red().bold());
        eprintln!("{}", format!("Error: {:#}", err).red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    // One-shot commands should not wait for menu settling
    settings.install_settle_ms = 0;
    settings.links_changed_settle_ms = 0;

    if let Commands::Install { resources: Some(dir) } = &cli.command {
        settings.resource_dir = Some(dir.clone());
    }

    let mut session = Session::open(settings, cli.store, cli.offline)?;

    match cli.command {
        Commands::Install { .. } => {
            session.router.on_install().await;
            session.settle().await;
            println!("{}", "✅ Installed".green().bold());
            render::print_host_activity(&session.host);
            render::print_menu(&session.host.menu());
        }

        Commands::Startup => {
            session.router.on_startup().await;
            render::print_host_activity(&session.host);
            render::print_menu(&session.host.menu());
        }

        Commands::Click => {
            session.router.on_action_clicked().await;
            session.settle().await;
            render::print_host_activity(&session.host);
        }

        Commands::Menu => {
            session.router.menus().rebuild_from_store().await;
            render::print_menu(&session.host.menu());
        }

        Commands::MenuClick { id } => match session.router.on_menu_clicked(&id).await {
            ClickOutcome::Ignored => println!("{}", format!("Nothing to do for '{}'", id).dimmed()),
            _ => render::print_host_activity(&session.host),
        },

        Commands::ResolveIcon { url } => {
            let url = match url {
                Some(url) => url,
                None => load_configuration(session.store.as_ref(), session.router.settings())
                    .await
                    .left_click_url,
            };

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
            spinner.set_message(format!("Resolving icon for {}", url));
            spinner.enable_steady_tick(Duration::from_millis(100));
            let resolution = session.router.icons().resolve_detailed(&url).await;
            spinner.finish_and_clear();

            render::print_resolution(&url, &resolution);
        }

        Commands::Config { action } => run_config(&mut session, action).await?,

        Commands::Icon { action } => {
            match action {
                IconAction::Import { file } => {
                    let icon = session.options.import_custom_icon_file(&file).await?;
                    println!("{} {}", "✅ Custom icon imported:".green(), icon);
                }
                IconAction::Clear => {
                    session.options.clear_custom_icon().await?;
                    println!("{}", "✅ Custom icon removed".green());
                }
            }
            session.settle().await;
            render::print_host_activity(&session.host);
        }

        Commands::Links { action } => {
            let mut draft = session.options.load().await;
            match action {
                LinksAction::Export { file } => {
                    session.options.export_links(&draft, &file)?;
                    println!("{} {}", "✅ Links exported to".green(), file.display());
                }
                LinksAction::Import { file } => {
                    session.options.import_links(&mut draft, &file)?;
                    session.options.save(&draft).await?;
                    session.settle().await;
                    println!("{} {} links", "✅ Imported".green(), draft.links.len());
                    render::print_menu(&session.host.menu());
                }
            }
        }

        Commands::Options => interactive::run_options_editor(&mut session).await?,
    }

    Ok(())
}

async fn run_config(session: &mut Session, action: ConfigAction) -> Result<()> {
    let mut draft = session.options.load().await;

    match action {
        ConfigAction::Show => {
            let config = load_configuration(session.store.as_ref(), session.router.settings()).await;
            render::print_configuration(&config, draft.has_custom_icon);
            return Ok(());
        }
        ConfigAction::SetUrl { url } => draft.left_click_url = url,
        ConfigAction::AddLink { title, url } => draft.links.push(LinkEntry::new(title, url)),
        ConfigAction::RemoveLink { index } => {
            draft.remove_link(index)?;
        }
        ConfigAction::ForceIcon { enabled } => draft.force_custom_icon = enabled,
    }

    session
        .options
        .save(&draft)
        .await
        .context("Failed to save settings")?;
    session.settle().await;

    println!("{}", "✅ Settings saved successfully!".green().bold());
    render::print_host_activity(&session.host);
    if !session.host.menu().is_empty() {
        render::print_menu(&session.host.menu());
    }
    Ok(())
}
