//! File discovery for wildcard patterns

use crate::core::{ConfigError, ConfigResult};
use glob::{MatchOptions, Pattern};
use std::path::{Path, is_separator};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A parsed wildcard pattern.
///
/// Only the file name may contain wildcards. Any directory part is a literal
/// path below the file provider root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    directory: Vec<String>,
    file_name: Pattern,
}

impl FilePattern {
    /// Parse a pattern such as `appsettings.*.json` or `conf/*.json`
    pub fn parse(pattern: &str) -> ConfigResult<Self> {
        if pattern.trim().is_empty() {
            return Err(ConfigError::invalid_argument(
                "pattern",
                "File path must be a non-empty string",
            ));
        }
        if Path::new(pattern).is_absolute() {
            return Err(ConfigError::invalid_argument(
                "pattern",
                format!("'{pattern}' must be relative to the file provider root"),
            ));
        }

        let mut segments: Vec<&str> = pattern
            .split(is_separator)
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();
        let file_name = match segments.pop() {
            Some(name) if !pattern.ends_with(is_separator) => name,
            _ => {
                return Err(ConfigError::invalid_argument(
                    "pattern",
                    format!("'{pattern}' does not name a file"),
                ));
            }
        };

        for segment in &segments {
            if *segment == ".." || segment.contains(['*', '?', '[']) {
                return Err(ConfigError::invalid_argument(
                    "pattern",
                    format!(
                        "'{pattern}': wildcards are only supported in the file name, \
                         found directory segment '{segment}'"
                    ),
                ));
            }
        }

        Ok(Self {
            directory: segments.into_iter().map(str::to_string).collect(),
            file_name: Pattern::new(file_name)?,
        })
    }

    /// Literal directory part, `/`-separated, empty for the root itself
    pub fn directory(&self) -> String {
        self.directory.join("/")
    }

    /// Pattern for the file name
    pub fn file_name(&self) -> &Pattern {
        &self.file_name
    }

    /// Whether a bare file name matches
    pub fn matches_file_name(&self, name: &str) -> bool {
        self.file_name.matches_with(name, MATCH_OPTIONS)
    }

    /// The whole pattern as a glob over `/`-separated names relative to the root
    pub fn as_glob(&self) -> String {
        self.directory
            .iter()
            .map(|segment| Pattern::escape(segment))
            .chain(std::iter::once(self.file_name.as_str().to_string()))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Files under `root` matching the pattern, as `/`-separated names
    /// relative to `root`, sorted byte-wise.
    ///
    /// A missing directory yields no files.
    pub fn discover(&self, root: &Path) -> ConfigResult<Vec<String>> {
        let directory = self
            .directory
            .iter()
            .fold(root.to_path_buf(), |path, segment| path.join(segment));
        if !directory.is_dir() {
            tracing::debug!(
                directory = %directory.display(),
                "Wildcard directory does not exist"
            );
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&directory)
            .map_err(|e| ConfigError::file_read_error(&directory, e.to_string()))?;

        let prefix = self.directory();
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::file_read_error(&directory, e.to_string()))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !self.matches_file_name(&name) || !entry.path().is_file() {
                continue;
            }
            files.push(if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            });
        }

        files.sort();
        tracing::debug!(
            pattern = %self.as_glob(),
            matched = files.len(),
            "Discovered configuration files"
        );
        Ok(files)
    }
}
