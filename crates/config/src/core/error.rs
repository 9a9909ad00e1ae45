//! Configuration error types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// A caller-supplied argument was missing or malformed
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Name of the offending argument
        name: String,
        /// Error message
        message: String,
    },

    /// The operation cannot run in the current configuration
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Error message
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the configuration file
        path: PathBuf,
    },

    /// Configuration file read error
    #[error("Failed to read configuration file {path}: {message}")]
    FileReadError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration file parse error
    #[error("Failed to parse configuration file {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message describing the parse failure
        message: String,
    },

    /// Configuration format not supported
    #[error("Configuration format not supported: {format}")]
    FormatNotSupported {
        /// Format that is not supported
        format: String,
    },

    /// Configuration watch error
    #[error("Configuration watch error: {message}")]
    WatchError {
        /// Error message describing the watch failure
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a file read error
    pub fn file_read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::FileReadError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a format not supported error
    pub fn format_not_supported(format: impl Into<String>) -> Self {
        Self::FormatNotSupported {
            format: format.into(),
        }
    }

    /// Create a watch error
    pub fn watch_error(message: impl Into<String>) -> Self {
        Self::WatchError {
            message: message.into(),
        }
    }

    /// Check if error is due to a missing file
    pub fn is_missing_source(&self) -> bool {
        matches!(self, ConfigError::FileNotFound { .. })
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::InvalidArgument { .. } => ErrorCategory::Argument,
            ConfigError::InvalidOperation { .. } => ErrorCategory::Operation,
            ConfigError::FileNotFound { .. } => ErrorCategory::NotFound,
            ConfigError::FileReadError { .. } | ConfigError::WatchError { .. } => {
                ErrorCategory::Io
            }
            ConfigError::ParseError { .. } | ConfigError::FormatNotSupported { .. } => {
                ErrorCategory::Parse
            }
        }
    }
}

/// Error category for grouping errors
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input detected before any I/O
    Argument,
    /// Operation not possible with the current setup
    Operation,
    /// Resource not found
    NotFound,
    /// I/O error
    Io,
    /// Parse error
    Parse,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => ConfigError::file_not_found(PathBuf::from("unknown")),
            _ => ConfigError::file_read_error(PathBuf::from("unknown"), err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::parse_error(PathBuf::from("json"), format!("JSON error: {err}"))
    }
}

impl From<glob::PatternError> for ConfigError {
    fn from(err: glob::PatternError) -> Self {
        ConfigError::invalid_argument("pattern", err.to_string())
    }
}

impl From<notify::Error> for ConfigError {
    fn from(err: notify::Error) -> Self {
        ConfigError::watch_error(err.to_string())
    }
}
