//! Wildcard source descriptor

use super::WildcardProvider;
use crate::core::{
    ConfigError, ConfigResult, ConfigurationBuilder, ConfigurationProvider, ConfigurationSource,
    ProviderFactory,
};
use crate::files::FileProvider;
use crate::sources::{FileSourceOptions, LoadErrorHandler};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Describes a set of configuration files selected by a file-name pattern.
///
/// The aggregate is always optional: a pattern that matches nothing is an
/// empty configuration, not an error. Every matched file is loaded by a
/// child provider from the [`ProviderFactory`].
#[derive(Clone)]
pub struct WildcardSource {
    options: FileSourceOptions,
    factory: Option<Arc<dyn ProviderFactory>>,
}

impl WildcardSource {
    /// Create a descriptor with no pattern and no factory
    pub fn new() -> Self {
        Self {
            options: FileSourceOptions::new("").with_optional(true),
            factory: None,
        }
    }

    /// Create a descriptor for `pattern`
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        let mut source = Self::new();
        source.set_pattern(pattern);
        source
    }

    /// Set the pattern, relative to the file provider root
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.options.path = pattern.into();
    }

    /// Set or clear the file provider
    pub fn set_file_provider(&mut self, provider: Option<Arc<dyn FileProvider>>) {
        self.options.file_provider = provider;
    }

    /// Set whether the aggregate and its children reload on change
    pub fn set_reload_on_change(&mut self, reload_on_change: bool) {
        self.options.reload_on_change = reload_on_change;
    }

    /// Set the reload debounce
    pub fn set_reload_delay(&mut self, delay: Duration) {
        self.options.reload_delay = delay;
    }

    /// Set or clear the load error handler
    pub fn set_on_load_error(&mut self, handler: Option<LoadErrorHandler>) {
        self.options.on_load_error = handler;
    }

    /// Set the factory building one provider per matched file
    pub fn set_factory(&mut self, factory: impl ProviderFactory + 'static) {
        self.set_shared_factory(Arc::new(factory));
    }

    /// Set an already shared factory
    pub fn set_shared_factory(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factory = Some(factory);
    }

    /// Pattern relative to the file provider root
    pub fn pattern(&self) -> &str {
        self.options.path()
    }

    /// File provider, if resolved
    pub fn file_provider(&self) -> Option<&Arc<dyn FileProvider>> {
        self.options.file_provider()
    }

    /// Whether the aggregate and its children reload on change
    pub fn reload_on_change(&self) -> bool {
        self.options.reload_on_change()
    }

    /// Reload debounce
    pub fn reload_delay(&self) -> Duration {
        self.options.reload_delay()
    }

    /// Load error handler
    pub fn on_load_error(&self) -> Option<&LoadErrorHandler> {
        self.options.on_load_error()
    }

    /// Always `true`
    pub fn is_optional(&self) -> bool {
        self.options.is_optional()
    }

    /// Child provider factory
    pub fn factory(&self) -> Option<&Arc<dyn ProviderFactory>> {
        self.factory.as_ref()
    }

    /// Settings handed to the factory for every matched file
    pub fn options(&self) -> &FileSourceOptions {
        &self.options
    }

    /// Check that the descriptor can be built
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pattern().trim().is_empty() {
            return Err(ConfigError::invalid_argument(
                "pattern",
                "File path must be a non-empty string",
            ));
        }
        if self.factory.is_none() {
            return Err(ConfigError::invalid_argument(
                "factory",
                "Wildcard source must have a provider factory",
            ));
        }
        Ok(())
    }

    /// Turn a rooted pattern into a physical provider plus a relative pattern
    pub fn resolve_file_provider(&mut self) {
        self.options.resolve_file_provider();
    }

    /// Fill the file provider and load error handler from the builder
    pub fn ensure_defaults(&mut self, builder: &ConfigurationBuilder) -> ConfigResult<()> {
        self.options.ensure_defaults(builder)
    }
}

impl Default for WildcardSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WildcardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WildcardSource")
            .field("options", &self.options)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

impl ConfigurationSource for WildcardSource {
    fn build(&self, builder: &ConfigurationBuilder) -> ConfigResult<Arc<dyn ConfigurationProvider>> {
        let mut source = self.clone();
        source.resolve_file_provider();
        source.ensure_defaults(builder)?;

        let provider = Arc::new(WildcardProvider::new(source)?);
        if provider.source().reload_on_change() {
            provider.watch()?;
        }
        Ok(provider)
    }
}
