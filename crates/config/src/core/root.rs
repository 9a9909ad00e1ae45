//! Built configuration and section views

use super::path;
use super::{ConfigResult, ConfigurationProvider};
use std::sync::Arc;

/// Ordered set of loaded providers.
///
/// Lookups ask providers in registration order and return the first value
/// found. Child key enumeration threads the keys collected so far through
/// every provider.
#[derive(Debug, Clone)]
pub struct ConfigurationRoot {
    providers: Vec<Arc<dyn ConfigurationProvider>>,
}

impl ConfigurationRoot {
    /// Wrap already loaded providers
    pub fn new(providers: Vec<Arc<dyn ConfigurationProvider>>) -> Self {
        Self { providers }
    }

    /// Providers in registration order
    pub fn providers(&self) -> &[Arc<dyn ConfigurationProvider>] {
        &self.providers
    }

    /// Value of `key` from the first provider that has it
    pub fn get(&self, key: &str) -> Option<String> {
        self.providers.iter().find_map(|provider| provider.try_get(key))
    }

    /// Distinct immediate children of `parent` (top level when `None`)
    pub fn child_keys(&self, parent: Option<&str>) -> Vec<String> {
        let keys = self
            .providers
            .iter()
            .fold(Vec::new(), |earlier, provider| {
                provider.get_child_keys(&earlier, parent)
            });

        let mut distinct: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            if !distinct.iter().any(|seen| path::keys_equal(seen, &key)) {
                distinct.push(key);
            }
        }
        distinct.sort_by(|x, y| path::compare_keys(x, y));
        distinct
    }

    /// View of the section at `key`. The section need not exist.
    pub fn section(&self, key: &str) -> ConfigurationSection<'_> {
        ConfigurationSection {
            root: self,
            path: key.to_string(),
        }
    }

    /// Top-level sections
    pub fn children(&self) -> Vec<ConfigurationSection<'_>> {
        self.child_keys(None)
            .into_iter()
            .map(|key| self.section(&key))
            .collect()
    }

    /// Reload every provider in order, stopping at the first failure
    pub fn reload(&self) -> ConfigResult<()> {
        for provider in &self.providers {
            provider.load()?;
        }
        tracing::debug!(providers = self.providers.len(), "Reloaded configuration");
        Ok(())
    }
}

/// A path into a [`ConfigurationRoot`]
#[derive(Debug, Clone)]
pub struct ConfigurationSection<'a> {
    root: &'a ConfigurationRoot,
    path: String,
}

impl<'a> ConfigurationSection<'a> {
    /// Last segment of the path
    pub fn key(&self) -> &str {
        path::section_key(&self.path)
    }

    /// Full path from the root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value stored at this path
    pub fn value(&self) -> Option<String> {
        self.root.get(&self.path)
    }

    /// Value of a key relative to this section
    pub fn get(&self, key: &str) -> Option<String> {
        self.root.get(&path::combine([self.path.as_str(), key]))
    }

    /// Nested section
    pub fn section(&self, key: &str) -> ConfigurationSection<'a> {
        ConfigurationSection {
            root: self.root,
            path: path::combine([self.path.as_str(), key]),
        }
    }

    /// Immediate child sections
    pub fn children(&self) -> Vec<ConfigurationSection<'a>> {
        self.root
            .child_keys(Some(&self.path))
            .into_iter()
            .map(|key| self.section(&key))
            .collect()
    }

    /// Whether the section has a value or children
    pub fn exists(&self) -> bool {
        self.value().is_some() || !self.root.child_keys(Some(&self.path)).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemoryProvider;
    use pretty_assertions::assert_eq;

    fn memory(pairs: &[(&str, &str)]) -> Arc<dyn ConfigurationProvider> {
        Arc::new(MemoryProvider::new(pairs.iter().copied().collect()))
    }

    fn sample() -> ConfigurationRoot {
        ConfigurationRoot::new(vec![
            memory(&[("Server:Host", "first"), ("Name", "app")]),
            memory(&[("Server:Host", "second"), ("Server:Port", "80")]),
        ])
    }

    #[test]
    fn test_first_provider_wins() {
        let root = sample();
        assert_eq!(root.get("SERVER:HOST").as_deref(), Some("first"));
        assert_eq!(root.get("server:port").as_deref(), Some("80"));
        assert_eq!(root.get("missing"), None);
    }

    #[test]
    fn test_child_keys_are_distinct_and_sorted() {
        let root = sample();
        assert_eq!(root.child_keys(None), vec!["Name", "Server"]);
        assert_eq!(root.child_keys(Some("server")), vec!["Host", "Port"]);
    }

    #[test]
    fn test_sections() {
        let root = sample();
        let server = root.section("Server");
        assert_eq!(server.key(), "Server");
        assert!(server.exists());
        assert_eq!(server.value(), None);
        assert_eq!(server.get("port").as_deref(), Some("80"));

        let port = server.section("Port");
        assert_eq!(port.path(), "Server:Port");
        assert_eq!(port.key(), "Port");

        let names: Vec<_> = server.children().iter().map(|s| s.path().to_string()).collect();
        assert_eq!(names, vec!["Server:Host", "Server:Port"]);
        assert!(!root.section("nothing").exists());
    }
}
