//! Per-event relevance decision.
//!
//! [`ChangeFilter::classify`] is pure: it looks only at the root-relative path
//! and never touches the filesystem or any shared state.

use std::collections::HashSet;
use std::path::{Component, Path};

use crate::config::AutoSyncConfig;
use crate::types::{ChangeEvent, FilterDecision};

/// Leaf names starting with this marker are hidden and never synced.
pub const HIDDEN_MARKER: char = '.';

#[derive(Debug, Clone, Default)]
pub struct ChangeFilter {
    control_files: HashSet<String>,
    ignore_dirs: HashSet<String>,
    trigger_extensions: HashSet<String>,
    manifest_enabled: bool,
}

impl ChangeFilter {
    pub fn new(
        control_files: impl IntoIterator<Item = String>,
        ignore_dirs: impl IntoIterator<Item = String>,
        trigger_extensions: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            control_files: control_files
                .into_iter()
                .map(|f| normalize(&f))
                .collect(),
            ignore_dirs: ignore_dirs.into_iter().collect(),
            trigger_extensions: trigger_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            manifest_enabled: true,
        }
    }

    pub fn from_config(config: &AutoSyncConfig) -> Self {
        let mut filter = Self::new(
            config.all_control_files(),
            config.ignore_dirs.clone(),
            config.manifest.trigger_extensions.clone(),
        );
        filter.manifest_enabled = config.manifest.enabled;
        filter
    }

    /// Classify a watcher event. The event kind does not influence the result.
    pub fn classify_event(&self, event: &ChangeEvent) -> FilterDecision {
        self.classify(event.path.as_deref())
    }

    /// Classify a root-relative path.
    pub fn classify(&self, path: Option<&Path>) -> FilterDecision {
        let Some(path) = path else {
            return FilterDecision::Ignore;
        };
        if path.as_os_str().is_empty() {
            return FilterDecision::Ignore;
        }

        if self.in_ignored_dir(path) {
            return FilterDecision::Ignore;
        }

        let relative = normalize(&path.to_string_lossy());
        if self.control_files.contains(&relative) {
            return FilterDecision::Ignore;
        }

        let leaf = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        if leaf.is_empty() || leaf.starts_with(HIDDEN_MARKER) {
            return FilterDecision::Ignore;
        }

        if self.manifest_enabled && self.is_trigger_extension(path) {
            FilterDecision::RelevantManifestTrigger
        } else {
            FilterDecision::Relevant
        }
    }

    fn in_ignored_dir(&self, path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(name) => self.ignore_dirs.contains(&*name.to_string_lossy()),
            _ => false,
        })
    }

    fn is_trigger_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.trigger_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

/// Compare paths with forward slashes and no leading `./`.
fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    unified.trim_start_matches("./").to_string()
}
