//! File provider abstraction
//!
//! A file provider resolves relative file names to contents. Only providers
//! backed by a real directory expose a [`FileProvider::physical_root`], which
//! is what wildcard discovery and change watching need.

mod memory;
mod physical;

pub use memory::InMemoryFileProvider;
pub use physical::PhysicalFileProvider;

use crate::core::ConfigResult;
use std::fmt;
use std::path::Path;

/// Access to configuration files
pub trait FileProvider: Send + Sync + fmt::Debug {
    /// Short name of the provider kind, used in diagnostics
    fn kind(&self) -> &'static str;

    /// Root directory on disk, if the provider is backed by one
    fn physical_root(&self) -> Option<&Path> {
        None
    }

    /// Read a file relative to the provider root.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    fn read_to_string(&self, subpath: &str) -> ConfigResult<Option<String>>;
}
