//! Domain types shared by the watcher, scheduler, and orchestrator.
//!
//! Nothing here is persisted; every value lives for at most one process run.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Change events
// ---------------------------------------------------------------------------

/// What happened to a path, as reported by the filesystem watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    #[default]
    Modified,
    Renamed,
    Unknown,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "created"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Renamed => write!(f, "renamed"),
            ChangeKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single filesystem notification, relative to the watched root.
///
/// `path` is `None` when the platform did not report one; such events are
/// ignorable rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: Option<PathBuf>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: Some(path.into()),
        }
    }

    /// An event for which the watcher could not supply a path.
    pub fn pathless(kind: ChangeKind) -> Self {
        Self { kind, path: None }
    }
}

// ---------------------------------------------------------------------------
// Filter decision
// ---------------------------------------------------------------------------

/// Result of running a [`ChangeEvent`] through the change filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Control/system file, hidden file, or no path at all.
    Ignore,
    /// A change worth syncing.
    Relevant,
    /// A change worth syncing that also invalidates the manifest.
    RelevantManifestTrigger,
}

impl FilterDecision {
    pub fn is_relevant(self) -> bool {
        !matches!(self, FilterDecision::Ignore)
    }

    pub fn is_manifest_trigger(self) -> bool {
        matches!(self, FilterDecision::RelevantManifestTrigger)
    }
}

// ---------------------------------------------------------------------------
// Sync outcome
// ---------------------------------------------------------------------------

/// What one orchestrator run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// A commit was created and pushed.
    pub committed: bool,
    /// The manifest was regenerated successfully during this run.
    pub manifest_regenerated: bool,
    /// Another run was already in flight, so this one did nothing.
    pub skipped: bool,
    /// Message of the failure that ended the run early, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    /// The outcome of a run absorbed by the re-entrancy guard.
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
