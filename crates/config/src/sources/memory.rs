//! In-memory configuration source

use crate::core::{
    ConfigResult, ConfigurationBuilder, ConfigurationProvider, ConfigurationSource, KeyValueData,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Source holding fixed key/value pairs
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigurationSource {
    initial: KeyValueData,
}

impl MemoryConfigurationSource {
    /// Create a source from key/value pairs
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            initial: pairs.into_iter().collect(),
        }
    }
}

impl ConfigurationSource for MemoryConfigurationSource {
    fn build(&self, _builder: &ConfigurationBuilder) -> ConfigResult<Arc<dyn ConfigurationProvider>> {
        Ok(Arc::new(MemoryProvider::new(self.initial.clone())))
    }
}

/// Provider over a mutable in-memory map. `load` is a no-op.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    data: RwLock<KeyValueData>,
}

impl MemoryProvider {
    /// Create a provider from existing data
    pub fn new(data: KeyValueData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Set a value
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().insert(key, value);
    }
}

impl ConfigurationProvider for MemoryProvider {
    fn load(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn try_get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).map(str::to_owned)
    }

    fn get_child_keys(&self, earlier_keys: &[String], parent_path: Option<&str>) -> Vec<String> {
        self.data.read().child_keys(earlier_keys, parent_path)
    }
}
