//! Wildcard configuration sources
//!
//! A wildcard source selects every file whose name matches a glob such as
//! `appsettings.*.json` and exposes them as one provider. Matched files are
//! sorted byte-wise and the earliest file wins when several define a key.
//! Registration helpers live on [`ConfigurationBuilder`](crate::ConfigurationBuilder).

mod discovery;
mod provider;
mod registration;
mod source;

pub use discovery::FilePattern;
pub use provider::{ProviderSnapshot, WildcardProvider};
pub use source::WildcardSource;
