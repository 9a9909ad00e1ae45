//! Change watching for file-backed providers

mod file;
mod types;

pub use file::FileWatcher;
pub use types::{WatchEvent, WatchEventKind};

use crate::core::{ConfigResult, ConfigResultExt, ConfigurationProvider};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Debounce used when none is configured
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Reload `provider` whenever a file matching `pattern` under `root` changes.
///
/// Needs a Tokio runtime; without one this logs a warning and returns
/// `Ok(None)`. The watcher only holds a weak reference, so it never keeps the
/// provider alive. Failed reloads are logged and leave the provider's
/// previous data in place.
pub fn watch_for_reload(
    provider: &Arc<dyn ConfigurationProvider>,
    root: &Path,
    pattern: &str,
    delay: Duration,
) -> ConfigResult<Option<FileWatcher>> {
    let Ok(handle) = Handle::try_current() else {
        tracing::warn!(
            pattern,
            "No Tokio runtime available, reload on change is disabled"
        );
        return Ok(None);
    };

    let pattern = glob::Pattern::new(pattern)?;
    let weak = Arc::downgrade(provider);
    let spawner = handle.clone();
    let mut watcher = FileWatcher::new(root, pattern).with_debounce(delay);

    watcher.start(&handle, move |events| {
        let Some(provider) = weak.upgrade() else {
            return;
        };
        tracing::debug!(events = events.len(), "Reloading {:?} after file changes", provider);
        spawner.spawn_blocking(move || {
            provider.load().handle_error(|e| {
                tracing::warn!("Reload failed, keeping previous configuration: {}", e);
            });
        });
    })?;

    Ok(Some(watcher))
}
