//! In-memory file provider

use super::FileProvider;
use crate::core::ConfigResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// File provider holding file contents in memory.
///
/// Useful for tests and embedded defaults. It has no physical root, so it
/// cannot back a wildcard source.
#[derive(Debug, Default)]
pub struct InMemoryFileProvider {
    files: RwLock<HashMap<String, String>>,
}

impl InMemoryFileProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    #[must_use = "builder methods must be chained or built"]
    pub fn with_file(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    /// Add or replace a file
    pub fn insert(&self, name: impl Into<String>, content: impl Into<String>) {
        self.files.write().insert(name.into(), content.into());
    }

    /// Remove a file
    pub fn remove(&self, name: &str) -> Option<String> {
        self.files.write().remove(name)
    }
}

impl FileProvider for InMemoryFileProvider {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn read_to_string(&self, subpath: &str) -> ConfigResult<Option<String>> {
        Ok(self.files.read().get(subpath).cloned())
    }
}
