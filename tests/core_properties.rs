//! End-to-end behaviour of the icon resolver, menu builder and router
//! driven through the public API with in-memory doubles.

use pretty_assertions::assert_eq;
use serde_json::json;
use speeddial::icon::{IconOrigin, ScriptedProbe};
use speeddial::menu::{ClickOutcome, RebuildOutcome};
use speeddial::models::{keys, IconRef, LinkEntry};
use speeddial::platform::{HostCall, RecordingHost};
use speeddial::store::{ConfigStore, Items, MemoryStore, StorageArea};
use speeddial::{Event, EventRouter, Settings};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const SOURCES: [&str; 3] = [
    "https://first.example/{domain}.ico",
    "https://second.example/{domain}.ico",
    "https://third.example/{domain}.ico",
];

struct Harness {
    store: Arc<MemoryStore>,
    host: Arc<RecordingHost>,
    probe: Arc<ScriptedProbe>,
    router: EventRouter,
}

fn harness_with(host: RecordingHost, probe: ScriptedProbe, settings: Settings) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(host);
    let probe = Arc::new(probe);
    let router = EventRouter::new(store.clone(), host.clone(), probe.clone(), settings);
    Harness {
        store,
        host,
        probe,
        router,
    }
}

fn settings() -> Settings {
    Settings {
        favicon_sources: SOURCES.iter().map(|s| s.to_string()).collect(),
        ..Settings::immediate()
    }
}

fn harness(reachable: &[&str]) -> Harness {
    harness_with(RecordingHost::new(), ScriptedProbe::new(reachable.iter().copied()), settings())
}

fn items(value: serde_json::Value) -> Items {
    value.as_object().cloned().unwrap()
}

async fn set_links(store: &MemoryStore, links: &[LinkEntry]) {
    store
        .set(StorageArea::Sync, items(json!({ keys::RIGHT_CLICK_LINKS: links })))
        .await
        .unwrap();
}

#[tokio::test]
async fn rebuild_twice_gives_the_same_tree() {
    let h = harness(&[]);
    let links = vec![
        LinkEntry::new("A", "https://a.example"),
        LinkEntry::new("B", "https://b.example"),
    ];

    h.router.menus().rebuild(&links).await;
    let once = h.host.menu();
    h.router.menus().rebuild(&links).await;

    assert_eq!(h.host.menu(), once);
    assert_eq!(h.host.menu_ids(), vec!["link-0", "link-1", "separator", "settings"]);
}

#[tokio::test]
async fn click_index_survives_append() {
    let h = harness(&[]);
    let a = LinkEntry::new("A", "https://a.example");
    let b = LinkEntry::new("B", "https://b.example");
    let c = LinkEntry::new("C", "https://c.example");

    set_links(&h.store, &[a.clone(), b.clone()]).await;
    h.router.menus().rebuild_from_store().await;
    set_links(&h.store, &[a.clone(), b, c]).await;

    let outcome = h.router.on_menu_clicked("link-0").await;
    assert_eq!(
        outcome,
        ClickOutcome::OpenedLink {
            index: 0,
            url: a.url.clone()
        }
    );
    assert_eq!(h.host.opened_tabs(), vec![a.url]);
}

#[tokio::test]
async fn out_of_range_click_does_nothing() {
    let h = harness(&[]);
    set_links(&h.store, &[LinkEntry::new("A", "https://a.example")]).await;
    h.host.clear_calls();

    h.router.dispatch(Event::MenuClicked("link-1".to_string())).await;

    assert!(h.host.calls().is_empty());
}

#[tokio::test]
async fn cached_domain_needs_no_probe() {
    let h = harness(&["https://first.example/a.example.ico"]);
    h.store
        .set(
            StorageArea::Local,
            items(json!({ keys::ICON_CACHE: { "a.example": "https://cached.example/a.ico" } })),
        )
        .await
        .unwrap();

    let icon = h.router.icons().resolve("https://a.example/page").await;

    assert_eq!(icon, IconRef::from("https://cached.example/a.ico"));
    assert_eq!(h.probe.request_count(), 0);
}

#[tokio::test]
async fn only_the_second_source_answers() {
    let h = harness(&["https://second.example/a.example.ico"]);

    let resolution = h.router.icons().resolve_detailed("https://a.example/").await;

    assert_eq!(resolution.icon, IconRef::from("https://second.example/a.example.ico"));
    assert_eq!(resolution.origin, IconOrigin::Probed { source_index: 1 });
    assert_eq!(
        h.probe.requests(),
        vec![
            "https://first.example/a.example.ico".to_string(),
            "https://second.example/a.example.ico".to_string(),
        ]
    );

    let cache = h.store.get(StorageArea::Local, &[keys::ICON_CACHE]).await.unwrap();
    assert_eq!(
        cache[keys::ICON_CACHE],
        json!({ "a.example": "https://second.example/a.example.ico" })
    );
}

#[tokio::test]
async fn every_source_failing_gives_the_default() {
    let h = harness(&[]);

    let icon = h.router.icons().resolve("https://a.example/").await;

    assert_eq!(icon, IconRef::Packaged("icon.png".to_string()));
    assert_eq!(h.probe.request_count(), 3);
}

#[tokio::test]
async fn overlapping_rebuild_is_dropped() {
    let h = harness_with(RecordingHost::suspending(), ScriptedProbe::unreachable(), settings());
    let links = vec![LinkEntry::new("A", "https://a.example")];
    let menus = h.router.menus();

    let (first, second) = futures::join!(menus.rebuild(&links), menus.rebuild(&links));

    assert_eq!((first, second), (RebuildOutcome::Completed, RebuildOutcome::Dropped));
    assert_eq!(h.host.count(&HostCall::RemoveAllMenus), 1);
    assert_eq!(h.host.menu_ids(), vec!["link-0", "separator", "settings"]);
}

#[tokio::test]
async fn forced_custom_icon_wins_without_network() {
    let h = harness(&["https://first.example/a.example.ico"]);
    h.store
        .set(StorageArea::Sync, items(json!({ keys::FORCE_CUSTOM_ICON: true })))
        .await
        .unwrap();
    h.store
        .set(
            StorageArea::Local,
            items(json!({
                keys::CUSTOM_ICON: "data:image/png;base64,AAAA",
                keys::ICON_CACHE: { "a.example": "https://cached.example/a.ico" },
            })),
        )
        .await
        .unwrap();

    let icon = h.router.icons().resolve("https://a.example/").await;

    assert_eq!(icon, IconRef::Embedded("data:image/png;base64,AAAA".to_string()));
    assert_eq!(h.probe.request_count(), 0);
}

#[tokio::test]
async fn install_keeps_user_settings() {
    let h = harness(&[]);
    let mine = vec![LinkEntry::new("Mine", "https://mine.example")];
    set_links(&h.store, &mine).await;
    h.store
        .set(StorageArea::Sync, items(json!({ keys::LEFT_CLICK_URL: "https://mine.example" })))
        .await
        .unwrap();

    h.router.dispatch(Event::Installed).await;

    let stored = h
        .store
        .get(StorageArea::Sync, &[keys::LEFT_CLICK_URL, keys::RIGHT_CLICK_LINKS])
        .await
        .unwrap();
    assert_eq!(stored[keys::LEFT_CLICK_URL], "https://mine.example");
    assert_eq!(stored[keys::RIGHT_CLICK_LINKS], json!(mine));
    assert_eq!(h.host.menu()[0].title.as_deref(), Some("Mine"));
}

#[tokio::test]
async fn install_reads_newest_links_document() {
    let resources = TempDir::new().unwrap();
    fs::write(
        resources.path().join("links.json"),
        r#"{"links": [{"title": "Old", "url": "https://old.example"}]}"#,
    )
    .unwrap();
    fs::write(
        resources.path().join("links (1).json"),
        r#"{"url": "https://new.example", "links": [{"title": "New", "url": "https://new.example"}]}"#,
    )
    .unwrap();
    let h = harness_with(
        RecordingHost::new(),
        ScriptedProbe::new(["https://first.example/new.example.ico"]),
        Settings {
            resource_dir: Some(resources.path().to_path_buf()),
            ..settings()
        },
    );

    h.router.dispatch(Event::Installed).await;

    assert_eq!(h.host.menu()[0].title.as_deref(), Some("New"));
    assert_eq!(
        h.host.icon(),
        Some(IconRef::from("https://first.example/new.example.ico"))
    );
}

#[tokio::test]
async fn storage_changes_route_to_the_right_handler() {
    let h = harness(&["https://first.example/b.example.ico"]);
    let mut changes = h.store.subscribe();

    set_links(&h.store, &[LinkEntry::new("", "https://x.example")]).await;
    h.router.drain(&mut changes).await;
    assert_eq!(h.host.menu()[0].title.as_deref(), Some("Link 1"));
    assert_eq!(h.host.icon(), None);

    h.store
        .set(StorageArea::Sync, items(json!({ keys::LEFT_CLICK_URL: "https://b.example" })))
        .await
        .unwrap();
    h.router.drain(&mut changes).await;
    assert_eq!(h.host.icon(), Some(IconRef::from("https://first.example/b.example.ico")));
    assert_eq!(h.host.count(&HostCall::RemoveAllMenus), 1);
}

#[tokio::test]
async fn unavailable_store_still_works_with_defaults() {
    let h = harness(&[]);
    h.store.set_unavailable(true);

    let url = h.router.on_action_clicked().await;
    h.router.menus().rebuild_from_store().await;

    assert_eq!(url, "https://www.bing.com");
    assert_eq!(h.host.icon(), Some(IconRef::default_icon()));
    assert_eq!(h.host.menu_ids(), vec!["link-0", "separator", "settings"]);
}

#[tokio::test]
async fn install_with_unreadable_store_keeps_user_settings() {
    let h = harness(&[]);
    h.store
        .set(StorageArea::Sync, items(json!({ keys::LEFT_CLICK_URL: "https://mine.example" })))
        .await
        .unwrap();
    h.store.fail_reads(true);

    h.router.dispatch(Event::Installed).await;

    let sync = h.store.snapshot().sync;
    assert_eq!(sync[keys::LEFT_CLICK_URL], "https://mine.example");
    assert!(!sync.contains_key(keys::RIGHT_CLICK_LINKS));
    assert_eq!(h.host.icon(), Some(IconRef::default_icon()));
}

#[tokio::test]
async fn unreadable_cache_keeps_its_entries() {
    let h = harness(&["https://first.example/c.example.ico"]);
    h.store
        .set(
            StorageArea::Local,
            items(json!({ keys::ICON_CACHE: {
                "a.example": "https://first.example/a.example.ico",
                "b.example": "https://first.example/b.example.ico",
            } })),
        )
        .await
        .unwrap();
    h.store.fail_reads(true);

    let icon = h.router.icons().resolve("https://c.example/").await;

    assert_eq!(icon, IconRef::from("https://first.example/c.example.ico"));
    assert_eq!(
        h.store.snapshot().local[keys::ICON_CACHE],
        json!({
            "a.example": "https://first.example/a.example.ico",
            "b.example": "https://first.example/b.example.ico",
        })
    );
}

#[tokio::test]
async fn failed_link_write_leaves_the_menu_alone() {
    let h = harness(&[]);
    let mut changes = h.store.subscribe();
    h.store.fail_writes(true);

    let result = h
        .store
        .set(
            StorageArea::Sync,
            items(json!({ keys::RIGHT_CLICK_LINKS: [{ "title": "A", "url": "https://a.example" }] })),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(h.router.drain(&mut changes).await, 0);
    assert!(h.host.menu().is_empty());
}
