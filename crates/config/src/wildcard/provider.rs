//! Aggregate provider over every file matching a wildcard pattern

use super::{FilePattern, WildcardSource};
use crate::core::{ConfigError, ConfigResult, ConfigurationProvider, ProviderFactory};
use crate::watchers::{self, FileWatcher};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The files and child providers published by one successful load
#[derive(Debug, Default)]
pub struct ProviderSnapshot {
    generation: u64,
    files: Vec<String>,
    children: Vec<Box<dyn ConfigurationProvider>>,
}

impl ProviderSnapshot {
    /// Number of successful loads that produced this snapshot
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Matched files, in precedence order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Loaded child providers, one per file, in precedence order
    pub fn children(&self) -> &[Box<dyn ConfigurationProvider>] {
        &self.children
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the pattern matched nothing
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Provider merging one child provider per matched file.
///
/// Files are ordered byte-wise by name and the first child that has a key
/// wins, so `appsettings.a.json` takes precedence over `appsettings.b.json`.
/// Each load builds a complete new [`ProviderSnapshot`] and swaps it in, so
/// readers see either the previous set of files or the new one. A failed
/// load leaves the previous snapshot in place.
pub struct WildcardProvider {
    source: Arc<WildcardSource>,
    pattern: FilePattern,
    factory: Arc<dyn ProviderFactory>,
    snapshot: ArcSwap<ProviderSnapshot>,
    load_lock: Mutex<()>,
    watcher: Mutex<Option<FileWatcher>>,
}

impl WildcardProvider {
    /// Create and load a provider.
    ///
    /// The source must have a factory and a physical file provider; a failed
    /// first load fails construction.
    pub fn new(source: WildcardSource) -> ConfigResult<Self> {
        let factory = source.factory().cloned().ok_or_else(|| {
            ConfigError::invalid_operation("Wildcard source must have a provider factory")
        })?;
        let pattern = FilePattern::parse(source.pattern())?;

        let provider = Self {
            source: Arc::new(source),
            pattern,
            factory,
            snapshot: ArcSwap::from_pointee(ProviderSnapshot::default()),
            load_lock: Mutex::new(()),
            watcher: Mutex::new(None),
        };
        provider.load()?;
        Ok(provider)
    }

    /// The descriptor this provider was built from
    pub fn source(&self) -> &WildcardSource {
        &self.source
    }

    /// Currently published snapshot
    pub fn snapshot(&self) -> Arc<ProviderSnapshot> {
        self.snapshot.load_full()
    }

    /// Generation of the current snapshot
    pub fn generation(&self) -> u64 {
        self.snapshot.load().generation
    }

    /// Reload whenever a matching file changes.
    ///
    /// Needs a Tokio runtime; without one a warning is logged and the provider
    /// keeps working without change notifications.
    pub fn watch(self: &Arc<Self>) -> ConfigResult<()> {
        let root = self.physical_root()?.to_path_buf();
        let provider: Arc<dyn ConfigurationProvider> = self.clone();
        let watcher = watchers::watch_for_reload(
            &provider,
            &root,
            &self.pattern.as_glob(),
            self.source.reload_delay(),
        )?;
        *self.watcher.lock() = watcher;
        Ok(())
    }

    /// Whether a change watcher is running
    pub fn is_watching(&self) -> bool {
        self.watcher.lock().as_ref().is_some_and(FileWatcher::is_watching)
    }

    fn physical_root(&self) -> ConfigResult<&Path> {
        let provider = self.source.file_provider().ok_or_else(|| {
            ConfigError::invalid_operation(format!(
                "No file provider resolved for wildcard '{}'",
                self.source.pattern()
            ))
        })?;
        provider.physical_root().ok_or_else(|| {
            ConfigError::invalid_operation(format!(
                "Wildcard configuration requires a physical file provider, got '{}'",
                provider.kind()
            ))
        })
    }
}

impl ConfigurationProvider for WildcardProvider {
    fn load(&self) -> ConfigResult<()> {
        let _guard = self.load_lock.lock();

        let root = self.physical_root()?;
        let files = self.pattern.discover(root)?;

        let mut children = Vec::with_capacity(files.len());
        for file in &files {
            let child = self.factory.build(&self.source.options().for_child(file), file);
            child.load()?;
            children.push(child);
        }

        let generation = self.snapshot.load().generation + 1;
        let matched = files.len();
        let previous = self.snapshot.swap(Arc::new(ProviderSnapshot {
            generation,
            files,
            children,
        }));
        tracing::debug!(generation, files = matched, "Loaded {}", self);
        drop(previous);
        Ok(())
    }

    fn try_get(&self, key: &str) -> Option<String> {
        let snapshot = self.snapshot.load();
        snapshot
            .children
            .iter()
            .zip(&snapshot.files)
            .find_map(|(child, file)| {
                let value = child.try_get(key)?;
                tracing::trace!(key, file = file.as_str(), "Resolved key");
                Some(value)
            })
    }

    fn get_child_keys(&self, earlier_keys: &[String], parent_path: Option<&str>) -> Vec<String> {
        let snapshot = self.snapshot.load();
        let mut keys: Vec<String> = snapshot
            .children
            .iter()
            .flat_map(|child| child.get_child_keys(&[], parent_path))
            .collect();
        keys.extend_from_slice(earlier_keys);
        keys
    }
}

impl fmt::Display for WildcardProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WildcardProvider for '{}'", self.source.pattern())
    }
}

impl fmt::Debug for WildcardProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot.load();
        f.debug_struct("WildcardProvider")
            .field("pattern", &self.source.pattern())
            .field("generation", &snapshot.generation)
            .field("files", &snapshot.files)
            .finish()
    }
}
