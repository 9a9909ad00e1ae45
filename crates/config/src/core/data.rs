//! Flat key/value storage shared by leaf providers

use super::path::{self, KEY_DELIMITER};
use std::collections::HashMap;

/// Flat, case-insensitive key/value map.
///
/// Keys are stored under their normalized form but keep the spelling the
/// first writer used, which is what enumeration reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueData {
    entries: HashMap<String, (String, String)>,
}

impl KeyValueData {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        let normalized = path::normalize(&key);
        match self.entries.get_mut(&normalized) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.insert(normalized, (key, value));
                None
            }
        }
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&path::normalize(key))
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&path::normalize(key))
            .map(|(_, value)| value.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Immediate child segments below `parent_path`, merged with `earlier_keys`
    /// and sorted with [`path::compare_keys`].
    pub fn child_keys(&self, earlier_keys: &[String], parent_path: Option<&str>) -> Vec<String> {
        let prefix = parent_path.map(|parent| format!("{parent}{KEY_DELIMITER}"));
        let mut keys = Vec::with_capacity(self.entries.len() + earlier_keys.len());

        for (key, _) in self.entries.values() {
            let rest = match &prefix {
                None => key.as_str(),
                Some(prefix) => match key.get(..prefix.len()) {
                    Some(head)
                        if key.len() > prefix.len()
                            && path::normalize(head) == path::normalize(prefix) =>
                    {
                        &key[prefix.len()..]
                    }
                    _ => continue,
                },
            };
            let segment = match rest.find(KEY_DELIMITER) {
                Some(pos) => &rest[..pos],
                None => rest,
            };
            keys.push(segment.to_string());
        }

        keys.extend(earlier_keys.iter().cloned());
        keys.sort_by(|x, y| path::compare_keys(x, y));
        keys
    }
}

impl<K, V> FromIterator<(K, V)> for KeyValueData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}
