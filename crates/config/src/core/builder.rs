//! Configuration builder

use super::{ConfigResult, ConfigurationProvider, ConfigurationRoot, ConfigurationSource};
use crate::files::{FileProvider, PhysicalFileProvider};
use crate::sources::{
    FileConfigurationSource, FileFormat, FileSourceOptions, LoadErrorHandler,
    MemoryConfigurationSource,
};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Collects sources and builds them into a [`ConfigurationRoot`].
///
/// Sources are kept in registration order; the first registered provider
/// that knows a key wins when the root is queried.
#[derive(Clone, Default)]
pub struct ConfigurationBuilder {
    /// Registered sources
    sources: Vec<Arc<dyn ConfigurationSource>>,

    /// Default file provider for sources that have none
    file_provider: Option<Arc<dyn FileProvider>>,

    /// Default load error handler for file sources
    load_error_handler: Option<LoadErrorHandler>,
}

impl ConfigurationBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    #[must_use = "builder methods must be chained or built"]
    pub fn add(self, source: impl ConfigurationSource) -> Self {
        self.add_shared(Arc::new(source))
    }

    /// Add an already shared configuration source
    #[must_use = "builder methods must be chained or built"]
    pub fn add_shared(mut self, source: Arc<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Registered sources in order
    pub fn sources(&self) -> &[Arc<dyn ConfigurationSource>] {
        &self.sources
    }

    /// Registered sources of one concrete type
    pub fn sources_of<T: ConfigurationSource>(&self) -> impl Iterator<Item = &T> {
        self.sources.iter().filter_map(|source| {
            let source: &dyn Any = &**source;
            source.downcast_ref::<T>()
        })
    }

    /// Use a directory on disk as the default file provider
    pub fn with_base_path(self, path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let provider = PhysicalFileProvider::new(path)?;
        Ok(self.with_file_provider(Arc::new(provider)))
    }

    /// Set the default file provider
    #[must_use = "builder methods must be chained or built"]
    pub fn with_file_provider(mut self, provider: Arc<dyn FileProvider>) -> Self {
        self.file_provider = Some(provider);
        self
    }

    /// Default file provider; the current directory when none was set
    pub fn file_provider(&self) -> ConfigResult<Arc<dyn FileProvider>> {
        match &self.file_provider {
            Some(provider) => Ok(Arc::clone(provider)),
            None => Ok(Arc::new(PhysicalFileProvider::new(std::env::current_dir()?)?)),
        }
    }

    /// Set the default load error handler
    #[must_use = "builder methods must be chained or built"]
    pub fn with_load_error_handler(mut self, handler: LoadErrorHandler) -> Self {
        self.load_error_handler = Some(handler);
        self
    }

    /// Default load error handler
    pub fn load_error_handler(&self) -> Option<&LoadErrorHandler> {
        self.load_error_handler.as_ref()
    }

    /// Add a single JSON file
    #[must_use = "builder methods must be chained or built"]
    pub fn add_json_file(self, path: impl Into<String>, optional: bool) -> Self {
        self.add(FileConfigurationSource::new(
            FileSourceOptions::new(path).with_optional(optional),
            FileFormat::Json,
        ))
    }

    /// Add fixed key/value pairs
    #[must_use = "builder methods must be chained or built"]
    pub fn add_in_memory<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.add(MemoryConfigurationSource::new(pairs))
    }

    /// Build every source, in order, into a configuration root
    pub fn build(&self) -> ConfigResult<ConfigurationRoot> {
        let providers = self
            .sources
            .iter()
            .map(|source| source.build(self))
            .collect::<ConfigResult<Vec<Arc<dyn ConfigurationProvider>>>>()?;

        tracing::debug!(providers = providers.len(), "Built configuration root");
        Ok(ConfigurationRoot::new(providers))
    }
}

impl fmt::Debug for ConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationBuilder")
            .field("sources", &self.sources)
            .field("file_provider", &self.file_provider)
            .field("load_error_handler", &self.load_error_handler.is_some())
            .finish()
    }
}
