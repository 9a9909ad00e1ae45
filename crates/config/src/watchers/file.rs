//! File system watcher for configuration files

use super::{WatchEvent, WatchEventKind};
use crate::core::{ConfigError, ConfigResult};
use glob::{MatchOptions, Pattern};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const EVENT_BUFFER: usize = 64;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Watches a directory for changes to files matching a pattern.
///
/// Events are batched: the first event of a burst starts the debounce timer
/// and everything that arrives before it fires is delivered in one callback.
pub struct FileWatcher {
    /// Directory being watched
    root: PathBuf,

    /// Names of interest, relative to `root`
    pattern: Pattern,

    /// Quiet time before a batch is delivered
    debounce_duration: Duration,

    /// Backend watcher; dropping it closes the event channel
    watcher: Option<RecommendedWatcher>,

    /// Debounce task
    task: Option<JoinHandle<()>>,

    /// Currently watching
    watching: Arc<AtomicBool>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("root", &self.root)
            .field("pattern", &self.pattern.as_str())
            .field("watching", &self.watching.load(Ordering::Relaxed))
            .field("debounce_duration", &self.debounce_duration)
            .finish()
    }
}

impl FileWatcher {
    /// Create a stopped watcher for `pattern` under `root`
    pub fn new(root: impl Into<PathBuf>, pattern: Pattern) -> Self {
        Self {
            root: root.into(),
            pattern,
            debounce_duration: super::DEFAULT_DEBOUNCE,
            watcher: None,
            task: None,
            watching: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set debounce duration
    #[must_use = "builder methods must be chained or built"]
    pub fn with_debounce(mut self, duration: Duration) -> Self {
        self.debounce_duration = duration;
        self
    }

    /// Directory being watched
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` is a file this watcher reports on
    pub fn matches(&self, path: &Path) -> bool {
        relative_name(&self.root, path)
            .is_some_and(|name| self.pattern.matches_with(&name, MATCH_OPTIONS))
    }

    /// Start watching, delivering batches of events to `callback` on `handle`
    pub fn start<F>(&mut self, handle: &Handle, callback: F) -> ConfigResult<()>
    where
        F: Fn(Vec<WatchEvent>) + Send + Sync + 'static,
    {
        if self.watching.load(Ordering::Relaxed) {
            return Err(ConfigError::watch_error("Already watching"));
        }

        let (tx, mut rx) = mpsc::channel::<WatchEvent>(EVENT_BUFFER);
        let root = self.root.clone();
        let canonical_root = self.root.canonicalize().unwrap_or_else(|_| root.clone());
        let pattern = self.pattern.clone();

        let mut fs_watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Watch error: {}", e);
                    return;
                }
            };
            let Some(kind) = WatchEventKind::from_notify(&event.kind) else {
                return;
            };

            for path in event.paths {
                let name = relative_name(&root, &path)
                    .or_else(|| relative_name(&canonical_root, &path));
                if !name.is_some_and(|name| pattern.matches_with(&name, MATCH_OPTIONS)) {
                    continue;
                }
                // A full buffer already guarantees a pending batch
                if tx.try_send(WatchEvent::new(kind, path)).is_err() {
                    tracing::trace!("Watch event buffer full, dropping event");
                }
            }
        })
        .map_err(|e| ConfigError::watch_error(e.to_string()))?;

        let (target, mode) = watch_target(&self.root, &self.pattern);
        fs_watcher.watch(&target, mode).map_err(|e| {
            ConfigError::watch_error(format!("Failed to watch {}: {}", target.display(), e))
        })?;

        let debounce = self.debounce_duration;
        let watching = Arc::clone(&self.watching);
        self.task = Some(handle.spawn(async move {
            while let Some(first) = rx.recv().await {
                tokio::time::sleep(debounce).await;
                let mut batch = vec![first];
                while let Ok(event) = rx.try_recv() {
                    batch.push(event);
                }
                callback(batch);
            }
            watching.store(false, Ordering::Relaxed);
        }));
        self.watcher = Some(fs_watcher);
        self.watching.store(true, Ordering::Relaxed);

        tracing::info!(
            root = %self.root.display(),
            target = %target.display(),
            pattern = self.pattern.as_str(),
            "Started watching"
        );
        Ok(())
    }

    /// Stop watching. Pending batches are discarded.
    pub fn stop(&mut self) {
        if !self.watching.swap(false, Ordering::Relaxed) {
            return;
        }
        self.watcher = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        tracing::info!(root = %self.root.display(), "Stopped watching");
    }

    /// Currently watching
    pub fn is_watching(&self) -> bool {
        self.watching.load(Ordering::Relaxed)
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Directory to hand to the backend.
///
/// A literal directory prefix that exists is watched on its own. A prefix
/// that is missing or contains wildcards falls back to the whole root,
/// recursively, so files appearing below it are still seen.
fn watch_target(root: &Path, pattern: &Pattern) -> (PathBuf, RecursiveMode) {
    let Some((prefix, _)) = pattern.as_str().rsplit_once('/') else {
        return (root.to_path_buf(), RecursiveMode::NonRecursive);
    };
    if !prefix.contains(['*', '?', '[']) {
        let directory = prefix.split('/').fold(root.to_path_buf(), |dir, segment| dir.join(segment));
        if directory.is_dir() {
            return (directory, RecursiveMode::NonRecursive);
        }
    }
    (root.to_path_buf(), RecursiveMode::Recursive)
}

/// `path` relative to `root`, `/`-separated
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    (!segments.is_empty()).then(|| segments.join("/"))
}
