mod common;

use common::{init_tracing, with_fixtures, write};
use std::time::{Duration, Instant};
use wildcard_config::prelude::*;

const FIXTURES: &[&str] = &["appsettings.a.json", "appsettings.b.json"];

fn build_watched(dir: &std::path::Path) -> ConfigurationRoot {
    ConfigurationBuilder::new()
        .with_base_path(dir)
        .unwrap()
        .add_wildcard(|source| {
            source.set_pattern("appsettings.*.json");
            source.set_factory(FileProviderFactory::new(FileFormat::Json));
            source.set_reload_on_change(true);
            source.set_reload_delay(Duration::from_millis(50));
        })
        .unwrap()
        .build()
        .unwrap()
}

/// Poll until `check` holds or the deadline passes
async fn eventually(check: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_new_file_is_picked_up() {
    init_tracing();
    let dir = with_fixtures(FIXTURES);
    let root = build_watched(dir.path());
    assert_eq!(root.get("key3"), None);

    write(dir.path(), "appsettings.c.json", r#"{"key3": "value3"}"#);

    assert!(eventually(|| root.get("key3").as_deref() == Some("value3")).await);
    assert_eq!(root.get("shared").as_deref(), Some("A"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_changed_file_is_reloaded() {
    init_tracing();
    let dir = with_fixtures(FIXTURES);
    let root = build_watched(dir.path());

    write(dir.path(), "appsettings.a.json", r#"{"key1": "changed", "shared": "A2"}"#);

    assert!(eventually(|| root.get("shared").as_deref() == Some("A2")).await);
    assert_eq!(root.get("key1").as_deref(), Some("changed"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_broken_file_keeps_previous_values() {
    init_tracing();
    let dir = with_fixtures(FIXTURES);
    let root = build_watched(dir.path());

    write(dir.path(), "appsettings.0.json", "{ not json");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(root.get("key1").as_deref(), Some("value1"));

    write(dir.path(), "appsettings.0.json", r#"{"key1": "fixed"}"#);
    assert!(eventually(|| root.get("key1").as_deref() == Some("fixed")).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unrelated_files_are_ignored() {
    init_tracing();
    let dir = with_fixtures(FIXTURES);
    let root = build_watched(dir.path());

    write(dir.path(), "other.json", r#"{"key9": "value9"}"#);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(root.get("key9"), None);
}

#[test]
fn test_without_runtime_reload_is_manual() {
    init_tracing();
    let dir = with_fixtures(FIXTURES);
    let root = build_watched(dir.path());

    write(dir.path(), "appsettings.c.json", r#"{"key3": "value3"}"#);
    assert_eq!(root.get("key3"), None);

    root.reload().unwrap();
    assert_eq!(root.get("key3").as_deref(), Some("value3"));
}
