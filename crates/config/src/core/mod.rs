//! Core configuration functionality

pub mod builder;
pub mod data;
pub mod error;
pub mod path;
pub mod result;
pub mod root;
pub mod traits;

// Re-export core types
pub use builder::ConfigurationBuilder;
pub use data::KeyValueData;
pub use error::{ConfigError, ErrorCategory};
pub use result::{ConfigResult, ConfigResultExt};
pub use root::{ConfigurationRoot, ConfigurationSection};

// Re-export core traits
pub use traits::{ConfigurationProvider, ConfigurationSource, ProviderFactory};
