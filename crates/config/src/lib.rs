//! Wildcard Config - file-pattern configuration sources
//!
//! This crate aggregates every configuration file matching a glob such as
//! `appsettings.*.json` into a single provider, with deterministic precedence,
//! atomic reloads and optional reload-on-change.
//!
//! # Example
//!
//! ```rust,no_run
//! use wildcard_config::prelude::*;
//!
//! fn main() -> ConfigResult<()> {
//!     let config = ConfigurationBuilder::new()
//!         .with_base_path("/etc/myapp")?
//!         .add_json_wildcard("appsettings.*.json")?
//!         .add_in_memory([("Server:Port", "8080")])
//!         .build()?;
//!
//!     let _port = config.get("server:port");
//!     for section in config.section("Logging").children() {
//!         println!("{} = {:?}", section.path(), section.value());
//!     }
//!     Ok(())
//! }
//! ```

#![deny(unused_must_use)]
#![warn(missing_docs)]

// Core module with main functionality
pub mod core;

// Implementation modules
pub mod files;
pub mod sources;
pub mod watchers;
pub mod wildcard;

// Re-export main types from core
pub use core::{
    ConfigError, ConfigResult, ConfigResultExt, ConfigurationBuilder, ConfigurationRoot,
    ConfigurationSection, ErrorCategory, KeyValueData,
};

// Re-export traits
pub use core::{ConfigurationProvider, ConfigurationSource, ProviderFactory};
pub use files::FileProvider;

// Re-export concrete implementations
pub use files::{InMemoryFileProvider, PhysicalFileProvider};
pub use sources::{
    FileConfigurationProvider, FileConfigurationSource, FileFormat, FileLoadContext,
    FileProviderFactory, FileSourceOptions, LoadErrorAction, LoadErrorHandler,
    MemoryConfigurationSource, MemoryProvider,
};
pub use watchers::{FileWatcher, WatchEvent, WatchEventKind};
pub use wildcard::{FilePattern, ProviderSnapshot, WildcardProvider, WildcardSource};

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude for common imports
    //!
    //! # Example
    //! ```rust
    //! use wildcard_config::prelude::*;
    //! ```

    // Core types
    pub use crate::core::{
        ConfigError, ConfigResult, ConfigResultExt, ConfigurationBuilder, ConfigurationRoot,
        ConfigurationSection,
    };

    // Traits
    pub use crate::core::{ConfigurationProvider, ConfigurationSource, ProviderFactory};
    pub use crate::files::FileProvider;

    // Common sources
    pub use crate::files::{InMemoryFileProvider, PhysicalFileProvider};
    pub use crate::sources::{FileFormat, FileProviderFactory, FileSourceOptions, LoadErrorAction};
    pub use crate::wildcard::{WildcardProvider, WildcardSource};
}
