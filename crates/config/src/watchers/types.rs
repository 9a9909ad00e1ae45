//! Watcher-specific types and events

use notify::EventKind;
use notify::event::ModifyKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A change to a watched file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// What happened
    pub kind: WatchEventKind,

    /// File that changed
    pub path: PathBuf,

    /// When the event was observed
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl WatchEvent {
    /// Create an event stamped with the current time
    pub fn new(kind: WatchEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Kind of file change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchEventKind {
    /// File created or renamed into place
    Created,

    /// File content changed
    Modified,

    /// File removed or renamed away
    Deleted,

    /// Any other change the backend could not classify
    Other,
}

impl WatchEventKind {
    /// Map a backend event kind.
    ///
    /// Returns `None` for events that cannot change file content: plain
    /// access and metadata-only updates.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(Self::Modified),
            EventKind::Remove(_) => Some(Self::Deleted),
            EventKind::Access(_) => None,
            _ => Some(Self::Other),
        }
    }
}
