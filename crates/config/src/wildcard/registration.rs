//! Builder methods registering wildcard sources

use super::WildcardSource;
use crate::core::{ConfigError, ConfigResult, ConfigurationBuilder};
use crate::files::FileProvider;
use crate::sources::{FileFormat, FileProviderFactory};
use std::sync::Arc;

impl ConfigurationBuilder {
    /// Add every JSON file matching `path`, without reloading
    pub fn add_json_wildcard(self, path: impl Into<String>) -> ConfigResult<Self> {
        self.add_json_wildcard_from(None, path, false)
    }

    /// Add every JSON file matching `path`
    pub fn add_json_wildcard_with_reload(
        self,
        path: impl Into<String>,
        reload_on_change: bool,
    ) -> ConfigResult<Self> {
        self.add_json_wildcard_from(None, path, reload_on_change)
    }

    /// Add every JSON file matching `path` under `provider`.
    ///
    /// Without a provider a rooted `path` picks its own directory, otherwise
    /// the builder's file provider is used.
    pub fn add_json_wildcard_from(
        self,
        provider: Option<Arc<dyn FileProvider>>,
        path: impl Into<String>,
        reload_on_change: bool,
    ) -> ConfigResult<Self> {
        self.add_format_wildcard(FileFormat::Json, provider, path.into(), reload_on_change)
    }

    /// Add every TOML file matching `path`
    #[cfg(feature = "toml")]
    pub fn add_toml_wildcard(self, path: impl Into<String>) -> ConfigResult<Self> {
        self.add_toml_wildcard_from(None, path, false)
    }

    /// Add every TOML file matching `path` under `provider`
    #[cfg(feature = "toml")]
    pub fn add_toml_wildcard_from(
        self,
        provider: Option<Arc<dyn FileProvider>>,
        path: impl Into<String>,
        reload_on_change: bool,
    ) -> ConfigResult<Self> {
        self.add_format_wildcard(FileFormat::Toml, provider, path.into(), reload_on_change)
    }

    /// Add every YAML file matching `path`
    #[cfg(feature = "yaml")]
    pub fn add_yaml_wildcard(self, path: impl Into<String>) -> ConfigResult<Self> {
        self.add_yaml_wildcard_from(None, path, false)
    }

    /// Add every YAML file matching `path` under `provider`
    #[cfg(feature = "yaml")]
    pub fn add_yaml_wildcard_from(
        self,
        provider: Option<Arc<dyn FileProvider>>,
        path: impl Into<String>,
        reload_on_change: bool,
    ) -> ConfigResult<Self> {
        self.add_format_wildcard(FileFormat::Yaml, provider, path.into(), reload_on_change)
    }

    /// Add a wildcard source set up by `configure`.
    ///
    /// Fails with `InvalidArgument` when the configured source has no
    /// pattern or no factory.
    pub fn add_wildcard<F>(self, configure: F) -> ConfigResult<Self>
    where
        F: FnOnce(&mut WildcardSource),
    {
        let mut source = WildcardSource::new();
        configure(&mut source);
        source.validate()?;
        tracing::debug!(pattern = source.pattern(), "Registered wildcard source");
        Ok(self.add(source))
    }

    fn add_format_wildcard(
        self,
        format: FileFormat,
        provider: Option<Arc<dyn FileProvider>>,
        path: String,
        reload_on_change: bool,
    ) -> ConfigResult<Self> {
        if path.trim().is_empty() {
            return Err(ConfigError::invalid_argument(
                "path",
                "File path must be a non-empty string",
            ));
        }

        self.add_wildcard(|source| {
            source.set_factory(FileProviderFactory::new(format));
            source.set_file_provider(provider);
            source.set_pattern(path);
            source.set_reload_on_change(reload_on_change);
            source.resolve_file_provider();
        })
    }
}
