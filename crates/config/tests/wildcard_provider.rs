mod common;

use common::{init_tracing, with_fixtures, write};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use wildcard_config::prelude::*;
use wildcard_config::{FileConfigurationProvider, KeyValueData};

const FIXTURES: &[&str] = &["appsettings.a.json", "appsettings.b.json"];

fn json_source(root: &std::path::Path, pattern: &str) -> WildcardSource {
    let mut source = WildcardSource::with_pattern(pattern);
    source.set_file_provider(Some(Arc::new(PhysicalFileProvider::new(root).unwrap())));
    source.set_factory(FileProviderFactory::new(FileFormat::Json));
    source
}

#[test]
fn test_first_file_wins() {
    init_tracing();
    let dir = with_fixtures(FIXTURES);

    let root = ConfigurationBuilder::new()
        .with_base_path(dir.path())
        .unwrap()
        .add_json_wildcard("appsettings.*.json")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(root.get("key1").as_deref(), Some("value1"));
    assert_eq!(root.get("key2").as_deref(), Some("value2"));
    assert_eq!(root.get("shared").as_deref(), Some("A"));
    assert_eq!(root.get("KEY1").as_deref(), Some("value1"));
    assert_eq!(root.child_keys(None), vec!["key1", "key2", "shared"]);
}

#[test]
fn test_child_keys_are_concatenated_per_child() {
    let dir = with_fixtures(FIXTURES);
    let provider = WildcardProvider::new(json_source(dir.path(), "appsettings.*.json")).unwrap();

    let earlier = vec!["earlier".to_string()];
    assert_eq!(
        provider.get_child_keys(&earlier, None),
        vec!["key1", "shared", "key2", "shared", "earlier"]
    );
}

#[test]
fn test_zero_matches_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let provider = WildcardProvider::new(json_source(dir.path(), "appsettings.*.json")).unwrap();

    assert!(provider.snapshot().is_empty());
    assert_eq!(provider.try_get("key1"), None);
    assert_eq!(
        provider.get_child_keys(&["a".to_string(), "b".to_string()], None),
        vec!["a", "b"]
    );
    assert!(provider.get_child_keys(&[], Some("anything")).is_empty());
}

#[test]
fn test_zero_matches_in_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let root = ConfigurationBuilder::new()
        .with_base_path(dir.path())
        .unwrap()
        .add_in_memory([("Name", "demo")])
        .add_json_wildcard("appsettings.*.json")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(root.providers().len(), 2);
    assert_eq!(root.child_keys(None), vec!["Name"]);
}

#[test]
fn test_malformed_file_fails_build() {
    let dir = with_fixtures(FIXTURES);
    write(dir.path(), "appsettings.c.json", "{ \"key3\": ");

    let err = ConfigurationBuilder::new()
        .with_base_path(dir.path())
        .unwrap()
        .add_json_wildcard("appsettings.*.json")
        .unwrap()
        .build()
        .unwrap_err();

    match err {
        ConfigError::ParseError { path, .. } => assert!(path.ends_with("appsettings.c.json")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_failed_reload_keeps_previous_values() {
    let dir = with_fixtures(FIXTURES);
    let provider = WildcardProvider::new(json_source(dir.path(), "appsettings.*.json")).unwrap();

    write(dir.path(), "appsettings.0.json", r#"{"key1": "override", "broken": "#);
    assert!(provider.load().is_err());
    assert_eq!(provider.try_get("key1").as_deref(), Some("value1"));
    assert_eq!(provider.try_get("broken"), None);
    assert_eq!(provider.generation(), 1);
}

#[test]
fn test_reload_picks_up_new_file() {
    let dir = with_fixtures(FIXTURES);
    let root = ConfigurationBuilder::new()
        .with_base_path(dir.path())
        .unwrap()
        .add_json_wildcard("appsettings.*.json")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(root.get("key3"), None);

    write(dir.path(), "appsettings.c.json", r#"{"key3": "value3", "shared": "C"}"#);
    root.reload().unwrap();

    assert_eq!(root.get("key3").as_deref(), Some("value3"));
    assert_eq!(root.get("shared").as_deref(), Some("A"));
    assert_eq!(root.child_keys(None), vec!["key1", "key2", "key3", "shared"]);
}

#[test]
fn test_removed_file_disappears_on_reload() {
    let dir = with_fixtures(FIXTURES);
    let provider = WildcardProvider::new(json_source(dir.path(), "appsettings.*.json")).unwrap();

    std::fs::remove_file(dir.path().join("appsettings.a.json")).unwrap();
    provider.load().unwrap();

    assert_eq!(provider.try_get("key1"), None);
    assert_eq!(provider.try_get("shared").as_deref(), Some("B"));
    assert_eq!(provider.snapshot().files(), ["appsettings.b.json"]);
}

#[test]
fn test_memory_file_provider_is_rejected() {
    let files = InMemoryFileProvider::new().with_file("appsettings.a.json", "{}");
    let err = ConfigurationBuilder::new()
        .add_json_wildcard_from(Some(Arc::new(files)), "appsettings.*.json", false)
        .unwrap()
        .build()
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidOperation { ref message } if message.contains("memory")));
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChildSettings {
    path: String,
    optional: bool,
    reload_on_change: bool,
}

#[test]
fn test_children_are_required_and_inherit_settings() {
    init_tracing();
    let dir = with_fixtures(FIXTURES);
    let seen: Arc<Mutex<Vec<ChildSettings>>> = Arc::default();
    let recorded = Arc::clone(&seen);

    let root = ConfigurationBuilder::new()
        .with_base_path(dir.path())
        .unwrap()
        .add_wildcard(move |source| {
            source.set_pattern("appsettings.*.json");
            source.set_reload_on_change(true);
            source.set_factory(move |options: &FileSourceOptions, _file: &str| {
                let child = options.clone();
                recorded.lock().push(ChildSettings {
                    path: child.path().to_string(),
                    optional: child.is_optional(),
                    reload_on_change: child.reload_on_change(),
                });
                Box::new(FileConfigurationProvider::new(child, FileFormat::Json))
                    as Box<dyn ConfigurationProvider>
            });
        })
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(root.get("shared").as_deref(), Some("A"));
    assert_eq!(
        *seen.lock(),
        vec![
            ChildSettings {
                path: "appsettings.a.json".into(),
                optional: false,
                reload_on_change: true,
            },
            ChildSettings {
                path: "appsettings.b.json".into(),
                optional: false,
                reload_on_change: true,
            },
        ]
    );
}

/// Child provider that counts how many instances have been dropped
#[derive(Debug)]
struct Tracked {
    data: KeyValueData,
    dropped: Arc<AtomicUsize>,
}

impl ConfigurationProvider for Tracked {
    fn load(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn try_get(&self, key: &str) -> Option<String> {
        self.data.get(key).map(str::to_owned)
    }

    fn get_child_keys(&self, earlier_keys: &[String], parent_path: Option<&str>) -> Vec<String> {
        self.data.child_keys(earlier_keys, parent_path)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_superseded_children_are_released() {
    let dir = with_fixtures(FIXTURES);
    let built = Arc::new(AtomicUsize::new(0));
    let dropped = Arc::new(AtomicUsize::new(0));

    let mut source = WildcardSource::with_pattern("appsettings.*.json");
    source.set_file_provider(Some(Arc::new(PhysicalFileProvider::new(dir.path()).unwrap())));
    let (built_in, dropped_in) = (Arc::clone(&built), Arc::clone(&dropped));
    source.set_factory(move |_: &FileSourceOptions, file: &str| {
        built_in.fetch_add(1, Ordering::SeqCst);
        Box::new(Tracked {
            data: [("file", file)].into_iter().collect(),
            dropped: Arc::clone(&dropped_in),
        }) as Box<dyn ConfigurationProvider>
    });

    let provider = WildcardProvider::new(source).unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 2);
    assert_eq!(dropped.load(Ordering::SeqCst), 0);

    let held = provider.snapshot();
    provider.load().unwrap();
    assert_eq!(dropped.load(Ordering::SeqCst), 0, "a reader still holds the old snapshot");
    drop(held);
    assert_eq!(dropped.load(Ordering::SeqCst), 2);

    provider.load().unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 6);
    assert_eq!(dropped.load(Ordering::SeqCst), 4);

    drop(provider);
    assert_eq!(dropped.load(Ordering::SeqCst), 6);
}

#[test]
fn test_readers_never_see_partial_snapshots() {
    let dir = with_fixtures(FIXTURES);
    let provider = Arc::new(
        WildcardProvider::new(json_source(dir.path(), "appsettings.*.json")).unwrap(),
    );
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let provider = Arc::clone(&provider);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let snapshot = provider.snapshot();
                    assert_eq!(snapshot.files().len(), snapshot.children().len());
                    assert!(snapshot.len() == 2 || snapshot.len() == 3);
                    assert_eq!(provider.try_get("key1").as_deref(), Some("value1"));
                }
            })
        })
        .collect();

    for round in 0..50 {
        if round % 2 == 0 {
            write(dir.path(), "appsettings.c.json", r#"{"key3": "value3"}"#);
        } else {
            std::fs::remove_file(dir.path().join("appsettings.c.json")).unwrap();
        }
        provider.load().unwrap();
        let expected = if round % 2 == 0 { Some("value3") } else { None };
        assert_eq!(provider.try_get("key3").as_deref(), expected);
    }

    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(provider.generation(), 51);
}
