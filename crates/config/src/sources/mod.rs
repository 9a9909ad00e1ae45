//! Leaf configuration sources
//!
//! Single files in any supported [`FileFormat`] and in-memory maps. The
//! wildcard source in [`crate::wildcard`] builds on the file provider here.

mod file;
mod format;
mod memory;
mod options;

pub use file::{FileConfigurationProvider, FileConfigurationSource, FileProviderFactory};
pub use format::{FileFormat, flatten};
pub use memory::{MemoryConfigurationSource, MemoryProvider};
pub use options::{
    DEFAULT_RELOAD_DELAY, FileLoadContext, FileSourceOptions, LoadErrorAction, LoadErrorHandler,
};
