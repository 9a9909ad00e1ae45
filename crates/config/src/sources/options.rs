//! Settings shared by file-backed sources

use crate::core::{ConfigError, ConfigResult, ConfigurationBuilder};
use crate::files::{FileProvider, PhysicalFileProvider};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default debounce between a file change and the reload it triggers
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(250);

/// What to do with a failed file load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorAction {
    /// Return the error to the caller of `load`
    Propagate,
    /// Swallow the error and continue with no data for this file
    Ignore,
}

/// Information handed to a [`LoadErrorHandler`]
#[derive(Debug)]
pub struct FileLoadContext<'a> {
    /// File name relative to the file provider root
    pub path: &'a str,
    /// The failure
    pub error: &'a ConfigError,
}

/// Callback deciding how a file load failure is handled
pub type LoadErrorHandler = Arc<dyn Fn(&FileLoadContext<'_>) -> LoadErrorAction + Send + Sync>;

/// Settings of a file-backed source
#[derive(Clone)]
pub struct FileSourceOptions {
    pub(crate) path: String,
    pub(crate) file_provider: Option<Arc<dyn FileProvider>>,
    pub(crate) optional: bool,
    pub(crate) reload_on_change: bool,
    pub(crate) reload_delay: Duration,
    pub(crate) on_load_error: Option<LoadErrorHandler>,
}

impl fmt::Debug for FileSourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSourceOptions")
            .field("path", &self.path)
            .field("file_provider", &self.file_provider)
            .field("optional", &self.optional)
            .field("reload_on_change", &self.reload_on_change)
            .field("reload_delay", &self.reload_delay)
            .field("on_load_error", &self.on_load_error.is_some())
            .finish()
    }
}

impl FileSourceOptions {
    /// Required, non-reloading options for `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_provider: None,
            optional: false,
            reload_on_change: false,
            reload_delay: DEFAULT_RELOAD_DELAY,
            on_load_error: None,
        }
    }

    /// Set the file provider
    #[must_use = "builder methods must be chained or built"]
    pub fn with_file_provider(mut self, provider: Arc<dyn FileProvider>) -> Self {
        self.file_provider = Some(provider);
        self
    }

    /// Set whether a missing file is acceptable
    #[must_use = "builder methods must be chained or built"]
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Set whether the source reloads when its files change
    #[must_use = "builder methods must be chained or built"]
    pub fn with_reload_on_change(mut self, reload_on_change: bool) -> Self {
        self.reload_on_change = reload_on_change;
        self
    }

    /// Set the reload debounce
    #[must_use = "builder methods must be chained or built"]
    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    /// Set the load error handler
    #[must_use = "builder methods must be chained or built"]
    pub fn with_on_load_error(mut self, handler: LoadErrorHandler) -> Self {
        self.on_load_error = Some(handler);
        self
    }

    /// Path or pattern relative to the file provider root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File provider, if resolved
    pub fn file_provider(&self) -> Option<&Arc<dyn FileProvider>> {
        self.file_provider.as_ref()
    }

    /// Whether a missing file is acceptable
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the source reloads when its files change
    pub fn reload_on_change(&self) -> bool {
        self.reload_on_change
    }

    /// Reload debounce
    pub fn reload_delay(&self) -> Duration {
        self.reload_delay
    }

    /// Load error handler
    pub fn on_load_error(&self) -> Option<&LoadErrorHandler> {
        self.on_load_error.as_ref()
    }

    /// Options for one file discovered by a wildcard source.
    ///
    /// Everything is inherited except the path, and the file is always
    /// required: a file that matched must load.
    pub fn for_child(&self, file: &str) -> Self {
        Self {
            path: file.to_string(),
            optional: false,
            ..self.clone()
        }
    }

    /// Turn a rooted path into a physical provider plus a relative path.
    ///
    /// Walks up from the path's directory to the closest directory that
    /// exists; the part below it becomes the new relative path. Does nothing
    /// when a provider is already set or the path is relative.
    pub fn resolve_file_provider(&mut self) {
        if self.file_provider.is_some() || self.path.is_empty() {
            return;
        }
        let path = Path::new(&self.path);
        if !path.is_absolute() {
            return;
        }
        let Some(file_name) = path.file_name() else {
            return;
        };

        let mut remainder = PathBuf::from(file_name);
        let mut directory = path.parent();
        while let Some(dir) = directory {
            if dir.is_dir() {
                break;
            }
            let Some(name) = dir.file_name() else {
                return;
            };
            remainder = Path::new(name).join(remainder);
            directory = dir.parent();
        }

        let Some(dir) = directory else {
            return;
        };
        if let Ok(provider) = PhysicalFileProvider::new(dir) {
            tracing::debug!(
                root = %dir.display(),
                "Resolved file provider for rooted path {}",
                self.path
            );
            self.path = remainder
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            self.file_provider = Some(Arc::new(provider));
        }
    }

    /// Fill unset settings from the builder
    pub fn ensure_defaults(&mut self, builder: &ConfigurationBuilder) -> ConfigResult<()> {
        if self.file_provider.is_none() {
            self.file_provider = Some(builder.file_provider()?);
        }
        if self.on_load_error.is_none() {
            self.on_load_error = builder.load_error_handler().cloned();
        }
        Ok(())
    }

    /// Run the load error handler for a failure
    pub(crate) fn handle_load_error(&self, error: ConfigError) -> ConfigResult<()> {
        let action = self
            .on_load_error
            .as_ref()
            .map(|handler| {
                handler(&FileLoadContext {
                    path: &self.path,
                    error: &error,
                })
            })
            .unwrap_or(LoadErrorAction::Propagate);

        match action {
            LoadErrorAction::Propagate => Err(error),
            LoadErrorAction::Ignore => {
                tracing::warn!("Ignoring load failure for {}: {}", self.path, error);
                Ok(())
            }
        }
    }
}
