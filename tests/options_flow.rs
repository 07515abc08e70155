//! Options page edits travelling through a file-backed store to the router

use pretty_assertions::assert_eq;
use speeddial::icon::OfflineProbe;
use speeddial::models::{IconRef, LinkEntry};
use speeddial::options::{LinkField, OptionsError, OptionsPage};
use speeddial::platform::RecordingHost;
use speeddial::store::{load_configuration, ConfigStore, JsonFileStore};
use speeddial::{EventRouter, Settings};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R'];

struct Setup {
    store: Arc<JsonFileStore>,
    host: Arc<RecordingHost>,
    router: EventRouter,
    options: OptionsPage,
}

fn open(path: &Path, settings: Settings) -> Setup {
    let store = Arc::new(JsonFileStore::open(path).unwrap());
    let host = Arc::new(RecordingHost::new());
    let options = OptionsPage::new(store.clone(), Arc::new(settings.clone()));
    let router = EventRouter::new(store.clone(), host.clone(), Arc::new(OfflineProbe), settings);
    Setup {
        store,
        host,
        router,
        options,
    }
}

#[tokio::test]
async fn saved_links_rebuild_the_menu_and_persist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let setup = open(&path, Settings::immediate());
    let mut changes = setup.store.subscribe();

    let mut draft = setup.options.load().await;
    draft.add_link();
    draft.update_link(0, LinkField::Title, "Docs").unwrap();
    draft.update_link(0, LinkField::Url, "https://docs.example").unwrap();
    draft.links.push(LinkEntry::new("", "https://blank.example"));
    setup.options.save(&draft).await.unwrap();

    assert_eq!(setup.router.drain(&mut changes).await, 1);
    assert_eq!(
        setup.host.menu_ids(),
        vec!["link-0", "link-1", "separator", "settings"]
    );
    assert_eq!(setup.host.menu()[1].title.as_deref(), Some("Link 2"));

    let reopened = JsonFileStore::open(&path).unwrap();
    let config = load_configuration(&reopened, &Settings::immediate()).await;
    assert_eq!(config.right_click_links, draft.links);
}

#[tokio::test]
async fn forced_custom_icon_reaches_the_button() {
    let dir = TempDir::new().unwrap();
    let setup = open(&dir.path().join("store.json"), Settings::immediate());
    let mut changes = setup.store.subscribe();

    let mut draft = setup.options.load().await;
    draft.force_custom_icon = true;
    setup.options.save(&draft).await.unwrap();
    let icon = setup.options.import_custom_icon(PNG_BYTES).await.unwrap();

    assert_eq!(setup.router.drain(&mut changes).await, 2);
    assert!(icon.as_str().starts_with("data:image/png;base64,"));
    assert_eq!(setup.host.icon(), Some(icon));
}

#[tokio::test]
async fn unforced_custom_icon_is_only_a_fallback() {
    let dir = TempDir::new().unwrap();
    let setup = open(&dir.path().join("store.json"), Settings::immediate());
    let mut changes = setup.store.subscribe();

    let icon = setup.options.import_custom_icon(PNG_BYTES).await.unwrap();
    setup.router.drain(&mut changes).await;
    assert_eq!(setup.host.icon(), None);

    // Offline, so no favicon source answers and the custom icon is next
    let resolved = setup.router.refresh_icon().await;
    assert_eq!(resolved, icon);
}

#[tokio::test]
async fn invalid_url_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let setup = open(&path, Settings::immediate());

    let mut draft = setup.options.load().await;
    draft.left_click_url = "not a url".to_string();
    let err = setup.options.save(&draft).await.unwrap_err();

    assert!(matches!(err, OptionsError::InvalidUrl { .. }));
    assert!(!path.exists());
}

#[tokio::test]
async fn exported_links_seed_a_fresh_install() {
    let dir = TempDir::new().unwrap();
    let resources = TempDir::new().unwrap();
    let first = open(&dir.path().join("first.json"), Settings::immediate());

    let mut draft = first.options.load().await;
    draft.left_click_url = "https://start.example".to_string();
    draft.links = vec![LinkEntry::new("Mail", "https://mail.example")];
    first
        .options
        .export_links(&draft, &resources.path().join("links.json"))
        .unwrap();

    let second = open(
        &dir.path().join("second.json"),
        Settings {
            resource_dir: Some(resources.path().to_path_buf()),
            ..Settings::immediate()
        },
    );
    second.router.on_install().await;

    let config = load_configuration(second.store.as_ref(), second.router.settings()).await;
    assert_eq!(config.left_click_url, "https://start.example");
    assert_eq!(config.right_click_links, draft.links);
    assert_eq!(second.host.menu()[0].title.as_deref(), Some("Mail"));
    assert_eq!(second.host.icon(), Some(IconRef::default_icon()));
}

#[tokio::test]
async fn failed_save_is_not_visible() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let setup = open(&path, Settings::immediate());
    let mut changes = setup.store.subscribe();
    std::fs::create_dir(&path).unwrap();

    let mut draft = setup.options.load().await;
    draft.left_click_url = "https://x.example".to_string();
    let err = setup.options.save(&draft).await.unwrap_err();

    assert!(matches!(err, OptionsError::Store(_)));
    assert_eq!(setup.router.drain(&mut changes).await, 0);
    let config = load_configuration(setup.store.as_ref(), setup.router.settings()).await;
    assert_eq!(config.left_click_url, "https://www.bing.com");
}
