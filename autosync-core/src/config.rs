//! Watcher configuration.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   .autosync.yaml     (optional — every field has a default)
//! ```
//!
//! The watched root itself is never read from the file: it is where the file
//! is looked up, so it comes from the command line (or the current directory).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};

/// File name of the per-root config file.
pub const CONFIG_FILE_NAME: &str = ".autosync.yaml";

pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;
pub const DEFAULT_COMMIT_PREFIX: &str = "Auto-sync";
pub const DEFAULT_MANIFEST_FILE: &str = "apps-manifest.json";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Top-level configuration for one watched root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSyncConfig {
    /// Watched root. Set by the caller, never serialized.
    #[serde(skip)]
    pub root: PathBuf,
    /// File this config was loaded from, when it was loaded explicitly.
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
    /// Quiet interval before a burst of changes is synced.
    pub debounce_ms: u64,
    /// Where the pushed content can be viewed; only used in log output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Commit messages read `<commit_prefix>: <local timestamp>`.
    pub commit_prefix: String,
    /// Root-relative files that never trigger a sync.
    pub control_files: Vec<String>,
    /// Directory names whose contents never trigger a sync.
    pub ignore_dirs: Vec<String>,
    pub manifest: ManifestSettings,
}

/// Manifest regeneration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSettings {
    pub enabled: bool,
    /// Output file, relative to the root.
    pub file: String,
    /// Extensions (without the dot, case-insensitive) that invalidate the manifest.
    pub trigger_extensions: Vec<String>,
    /// Shell command to run instead of the built-in generator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// File names never listed in the manifest.
    pub exclude_files: Vec<String>,
    /// Substrings that exclude a file or directory from the manifest scan.
    pub exclude_patterns: Vec<String>,
}

impl Default for AutoSyncConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            config_file: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            remote_url: None,
            commit_prefix: DEFAULT_COMMIT_PREFIX.to_string(),
            control_files: vec![CONFIG_FILE_NAME.to_string()],
            ignore_dirs: vec![".git".to_string()],
            manifest: ManifestSettings::default(),
        }
    }
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            file: DEFAULT_MANIFEST_FILE.to_string(),
            trigger_extensions: vec!["html".to_string()],
            command: None,
            exclude_files: vec!["index.html".to_string()],
            exclude_patterns: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "README.md".to_string(),
                ".log".to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl AutoSyncConfig {
    /// Default configuration for `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Control files plus every self-referential file: the generated
    /// manifest, the config file in use, and any script the manifest command
    /// names, as long as they live under the root.
    pub fn all_control_files(&self) -> Vec<String> {
        let mut files = self.control_files.clone();
        let mut add = |file: String| {
            if !files.contains(&file) {
                files.push(file);
            }
        };

        add(self.manifest.file.clone());
        if let Some(path) = self.config_file.as_deref().and_then(|p| self.relative_to_root(p)) {
            add(path);
        }
        for script in self.manifest_scripts() {
            add(script);
        }
        files
    }

    /// Words of `manifest.command` that name an existing file under the root.
    fn manifest_scripts(&self) -> Vec<String> {
        let Some(command) = &self.manifest.command else {
            return Vec::new();
        };
        command
            .split_whitespace()
            .filter(|word| !word.starts_with('-'))
            .map(|word| word.trim_matches(|c| c == '"' || c == '\''))
            .filter_map(|word| {
                let candidate = self.root.join(word);
                if candidate.is_file() {
                    self.relative_to_root(&candidate)
                } else {
                    None
                }
            })
            .collect()
    }

    /// `path` as a `/`-separated root-relative string, if it is under the root.
    fn relative_to_root(&self, path: &Path) -> Option<String> {
        let root = std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        let path = std::fs::canonicalize(self.root.join(path)).ok()?;
        let relative = path.strip_prefix(&root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    pub fn commit_message(&self, timestamp: &str) -> String {
        format!("{}: {}", self.commit_prefix, timestamp)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "debounce_ms must be greater than zero".to_string(),
            ));
        }
        if self.manifest.file.trim().is_empty() {
            return Err(ConfigError::Invalid("manifest.file must not be empty".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load `<root>/.autosync.yaml`, falling back to defaults when it is absent.
pub fn load_at(root: &Path) -> Result<AutoSyncConfig, ConfigError> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(AutoSyncConfig::for_root(root));
    }
    load_from(&path, root)
}

/// Load an explicit config file and attach it to `root`.
pub fn load_from(path: &Path, root: &Path) -> Result<AutoSyncConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let mut config: AutoSyncConfig = if raw.trim().is_empty() {
        AutoSyncConfig::default()
    } else {
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };
    config.root = root.to_path_buf();
    config.config_file =
        Some(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
    config.validate()?;
    Ok(config)
}

/// Write `config` to `<root>/.autosync.yaml`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn save_at(config: &AutoSyncConfig, force: bool) -> Result<PathBuf, ConfigError> {
    let path = config.config_path();
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&path, yaml).map_err(|e| io_err(&path, e))?;
    Ok(path)
}
