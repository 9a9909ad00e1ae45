//! Core traits for configuration system

use super::{ConfigResult, ConfigurationBuilder};
use crate::sources::FileSourceOptions;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A provider of hierarchical configuration values.
///
/// Leaf providers (one file, one in-memory map) and the wildcard aggregate
/// all implement this trait, so an aggregate can hold any mix of children.
pub trait ConfigurationProvider: Send + Sync + fmt::Debug {
    /// (Re)load the provider's data
    fn load(&self) -> ConfigResult<()>;

    /// Look up the value stored under `key`
    fn try_get(&self, key: &str) -> Option<String>;

    /// Immediate child segments under `parent_path` (top level when `None`),
    /// combined with the keys contributed by earlier providers
    fn get_child_keys(&self, earlier_keys: &[String], parent_path: Option<&str>) -> Vec<String>;
}

/// Describes how to build a provider
pub trait ConfigurationSource: Any + Send + Sync + fmt::Debug {
    /// Build (and load) the provider for this source
    fn build(&self, builder: &ConfigurationBuilder) -> ConfigResult<Arc<dyn ConfigurationProvider>>;
}

/// Builds the child provider for a single matched file.
///
/// `options` are the child's settings: the wildcard source's settings with
/// the path set to `file` and `optional` cleared. `file` is the matched name
/// relative to the file provider root.
pub trait ProviderFactory: Send + Sync {
    /// Create an unloaded provider for `file`
    fn build(&self, options: &FileSourceOptions, file: &str) -> Box<dyn ConfigurationProvider>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&FileSourceOptions, &str) -> Box<dyn ConfigurationProvider> + Send + Sync,
{
    fn build(&self, options: &FileSourceOptions, file: &str) -> Box<dyn ConfigurationProvider> {
        self(options, file)
    }
}
