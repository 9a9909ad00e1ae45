//! Directory-backed file provider

use super::FileProvider;
use crate::core::{ConfigError, ConfigResult};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// File provider rooted at a directory on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalFileProvider {
    root: PathBuf,
}

impl PhysicalFileProvider {
    /// Create a provider for `root`. The directory must exist.
    pub fn new(root: impl Into<PathBuf>) -> ConfigResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ConfigError::invalid_argument(
                "root",
                format!("'{}' is not an existing directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative name, refusing anything that escapes the root
    fn resolve(&self, subpath: &str) -> Option<PathBuf> {
        let relative = Path::new(subpath);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if subpath.is_empty() || escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl FileProvider for PhysicalFileProvider {
    fn kind(&self) -> &'static str {
        "physical"
    }

    fn physical_root(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn read_to_string(&self, subpath: &str) -> ConfigResult<Option<String>> {
        let Some(path) = self.resolve(subpath) else {
            return Ok(None);
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::file_read_error(&path, e.to_string())),
        }
    }
}
