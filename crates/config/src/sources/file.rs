//! Provider and source for a single configuration file

use super::{FileFormat, FileSourceOptions};
use crate::core::{
    ConfigError, ConfigResult, ConfigurationBuilder, ConfigurationProvider, ConfigurationSource,
    KeyValueData, ProviderFactory,
};
use crate::watchers::{self, FileWatcher};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Provider backed by one file.
///
/// Data is replaced as a whole on every successful load, so readers never
/// see a half-parsed file.
pub struct FileConfigurationProvider {
    options: FileSourceOptions,
    format: Option<FileFormat>,
    data: ArcSwap<KeyValueData>,
    watcher: Mutex<Option<FileWatcher>>,
}

impl FileConfigurationProvider {
    /// Create an unloaded provider for a known format
    pub fn new(options: FileSourceOptions, format: FileFormat) -> Self {
        Self::with_format(options, Some(format))
    }

    /// Create an unloaded provider that picks the format from the file extension
    pub fn detect(options: FileSourceOptions) -> Self {
        Self::with_format(options, None)
    }

    fn with_format(options: FileSourceOptions, format: Option<FileFormat>) -> Self {
        Self {
            options,
            format,
            data: ArcSwap::from_pointee(KeyValueData::new()),
            watcher: Mutex::new(None),
        }
    }

    /// Source settings
    pub fn options(&self) -> &FileSourceOptions {
        &self.options
    }

    /// Format used to parse the file
    pub fn format(&self) -> ConfigResult<FileFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => FileFormat::from_path(self.options.path()).ok_or_else(|| {
                ConfigError::format_not_supported(format!(
                    "no known format for '{}'",
                    self.options.path()
                ))
            }),
        }
    }

    /// Whether a change watcher is attached
    pub fn is_watching(&self) -> bool {
        self.watcher.lock().as_ref().is_some_and(FileWatcher::is_watching)
    }

    fn read_data(&self) -> ConfigResult<KeyValueData> {
        let path = self.options.path();
        let provider = self.options.file_provider().ok_or_else(|| {
            ConfigError::invalid_operation(format!("No file provider resolved for '{path}'"))
        })?;

        match provider.read_to_string(path)? {
            Some(content) => self.format()?.parse(&content, path),
            None if self.options.is_optional() => Ok(KeyValueData::new()),
            None => Err(ConfigError::file_not_found(path)),
        }
    }

    fn watch(self: &Arc<Self>) -> ConfigResult<()> {
        let Some(root) = self
            .options
            .file_provider()
            .and_then(|provider| provider.physical_root())
        else {
            tracing::debug!("Not watching {}: file provider has no physical root", self);
            return Ok(());
        };

        let pattern = glob::Pattern::escape(self.options.path());
        let provider: Arc<dyn ConfigurationProvider> = self.clone();
        let watcher =
            watchers::watch_for_reload(&provider, root, &pattern, self.options.reload_delay())?;
        *self.watcher.lock() = watcher;
        Ok(())
    }
}

impl ConfigurationProvider for FileConfigurationProvider {
    fn load(&self) -> ConfigResult<()> {
        match self.read_data() {
            Ok(data) => {
                tracing::debug!(keys = data.len(), "Loaded {}", self);
                self.data.store(Arc::new(data));
                Ok(())
            }
            Err(error) => {
                self.options.handle_load_error(error)?;
                self.data.store(Arc::new(KeyValueData::new()));
                Ok(())
            }
        }
    }

    fn try_get(&self, key: &str) -> Option<String> {
        self.data.load().get(key).map(str::to_owned)
    }

    fn get_child_keys(&self, earlier_keys: &[String], parent_path: Option<&str>) -> Vec<String> {
        self.data.load().child_keys(earlier_keys, parent_path)
    }
}

impl fmt::Display for FileConfigurationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FileConfigurationProvider for '{}' ({})",
            self.options.path(),
            if self.options.is_optional() {
                "optional"
            } else {
                "required"
            }
        )
    }
}

impl fmt::Debug for FileConfigurationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileConfigurationProvider")
            .field("options", &self.options)
            .field("format", &self.format)
            .field("keys", &self.data.load().len())
            .finish()
    }
}

/// Source for a single configuration file
#[derive(Debug, Clone)]
pub struct FileConfigurationSource {
    options: FileSourceOptions,
    format: Option<FileFormat>,
}

impl FileConfigurationSource {
    /// Create a source with a known format
    pub fn new(options: FileSourceOptions, format: FileFormat) -> Self {
        Self {
            options,
            format: Some(format),
        }
    }

    /// Create a source that picks the format from the file extension
    pub fn detect(options: FileSourceOptions) -> Self {
        Self {
            options,
            format: None,
        }
    }

    /// Source settings
    pub fn options(&self) -> &FileSourceOptions {
        &self.options
    }
}

impl ConfigurationSource for FileConfigurationSource {
    fn build(&self, builder: &ConfigurationBuilder) -> ConfigResult<Arc<dyn ConfigurationProvider>> {
        let mut options = self.options.clone();
        options.resolve_file_provider();
        options.ensure_defaults(builder)?;

        let provider = Arc::new(FileConfigurationProvider::with_format(options, self.format));
        provider.load()?;
        if provider.options.reload_on_change() {
            provider.watch()?;
        }
        Ok(provider)
    }
}

/// Factory creating one file provider per matched file, using the child
/// settings it is given as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileProviderFactory {
    format: Option<FileFormat>,
}

impl FileProviderFactory {
    /// Factory for files of one format
    pub fn new(format: FileFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    /// Factory choosing the format by each file's extension
    pub fn detect() -> Self {
        Self { format: None }
    }
}

impl ProviderFactory for FileProviderFactory {
    fn build(&self, options: &FileSourceOptions, _file: &str) -> Box<dyn ConfigurationProvider> {
        Box::new(FileConfigurationProvider::with_format(
            options.clone(),
            self.format,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::InMemoryFileProvider;
    use crate::sources::{FileLoadContext, LoadErrorAction};

    fn options(path: &str, files: InMemoryFileProvider) -> FileSourceOptions {
        FileSourceOptions::new(path).with_file_provider(Arc::new(files))
    }

    #[test]
    fn test_load_and_lookup() {
        let files = InMemoryFileProvider::new().with_file("app.json", r#"{"a":{"b":"c"}}"#);
        let provider = FileConfigurationProvider::new(options("app.json", files), FileFormat::Json);

        provider.load().unwrap();
        assert_eq!(provider.try_get("A:B").as_deref(), Some("c"));
        assert_eq!(provider.get_child_keys(&[], None), vec!["a"]);
        assert_eq!(provider.get_child_keys(&[], Some("a")), vec!["b"]);
    }

    #[test]
    fn test_missing_required_file() {
        let provider = FileConfigurationProvider::new(
            options("app.json", InMemoryFileProvider::new()),
            FileFormat::Json,
        );
        let err = provider.load().unwrap_err();
        assert!(err.is_missing_source());
    }

    #[test]
    fn test_missing_optional_file() {
        let provider = FileConfigurationProvider::new(
            options("app.json", InMemoryFileProvider::new()).with_optional(true),
            FileFormat::Json,
        );
        provider.load().unwrap();
        assert!(provider.get_child_keys(&[], None).is_empty());
    }

    #[test]
    fn test_ignored_failure_clears_data() {
        let files = Arc::new(InMemoryFileProvider::new().with_file("app.json", r#"{"a":"1"}"#));
        let opts = FileSourceOptions::new("app.json")
            .with_file_provider(files.clone())
            .with_on_load_error(Arc::new(|_: &FileLoadContext<'_>| LoadErrorAction::Ignore));
        let provider = FileConfigurationProvider::new(opts, FileFormat::Json);

        provider.load().unwrap();
        assert_eq!(provider.try_get("a").as_deref(), Some("1"));

        files.insert("app.json", "{ broken");
        provider.load().unwrap();
        assert_eq!(provider.try_get("a"), None);
    }

    #[test]
    fn test_detect_format() {
        let files = InMemoryFileProvider::new()
            .with_file("app.json", r#"{"a":"1"}"#)
            .with_file("app.ini", "a=1");

        let json = FileConfigurationProvider::detect(options("app.json", files));
        json.load().unwrap();
        assert_eq!(json.try_get("a").as_deref(), Some("1"));

        let files = InMemoryFileProvider::new().with_file("app.ini", "a=1");
        let ini = FileConfigurationProvider::detect(options("app.ini", files));
        assert!(matches!(
            ini.load().unwrap_err(),
            ConfigError::FormatNotSupported { .. }
        ));
    }

    #[test]
    fn test_factory_builds_required_children() {
        let parent = options("*.json", InMemoryFileProvider::new().with_file("a.json", "{}"))
            .with_optional(true)
            .with_reload_on_change(true);
        let child =
            FileProviderFactory::new(FileFormat::Json).build(&parent.for_child("a.json"), "a.json");

        child.load().unwrap();
        assert!(format!("{child:?}").contains("optional: false"));
        assert!(format!("{child:?}").contains("reload_on_change: true"));
    }

    #[test]
    fn test_display() {
        let provider = FileConfigurationProvider::new(
            FileSourceOptions::new("app.json").with_optional(true),
            FileFormat::Json,
        );
        assert_eq!(
            provider.to_string(),
            "FileConfigurationProvider for 'app.json' (optional)"
        );
    }
}
