//! Manifest generation for `autosync-manifest`.
//!
//! `generate(root, options)` walks a site root for HTML pages, pulls a title,
//! description, and icon out of each one, and writes the result as a JSON
//! manifest next to them. Pages without metadata fall back to a name derived
//! from the file name, a stock description, and a rotating default icon.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use autosync_core::config::{ManifestSettings, DEFAULT_MANIFEST_FILE};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Icons handed out in order to pages that do not declare `app-icon`.
pub const DEFAULT_ICONS: &[&str] = &[
    "📱", "⚡️", "🎯", "🚀", "✨", "🎨", "🔧", "📊", "🎮", "💡", "🔥", "⚙️", "📝", "🎵", "📷",
];

pub const DEFAULT_DESCRIPTION: &str = "A mini app";

/// One discovered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    pub name: String,
    /// Root-relative path with `/` separators.
    pub file: String,
    pub description: String,
    pub icon: String,
}

/// The document written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// UTC, written as RFC 3339 with millisecond precision
    /// (`2026-10-19T08:48:25.123Z`).
    #[serde(with = "millis_timestamp")]
    pub generated: DateTime<Utc>,
    pub apps: Vec<AppEntry>,
}

/// What to scan and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestOptions {
    /// Output file, relative to the root.
    pub manifest_file: String,
    /// File names never listed.
    pub exclude_files: Vec<String>,
    /// Substrings that exclude a file or directory name.
    pub exclude_patterns: Vec<String>,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self::from_settings(&ManifestSettings::default())
    }
}

impl ManifestOptions {
    pub fn from_settings(settings: &ManifestSettings) -> Self {
        Self {
            manifest_file: settings.file.clone(),
            exclude_files: settings.exclude_files.clone(),
            exclude_patterns: settings.exclude_patterns.clone(),
        }
    }

    fn excludes(&self, name: &str) -> bool {
        name == self.manifest_file
            || name == DEFAULT_MANIFEST_FILE
            || self.exclude_files.iter().any(|f| f == name)
            || self.exclude_patterns.iter().any(|p| name.contains(p.as_str()))
    }
}

/// Errors from manifest generation.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {0}")]
    Walk(#[from] walkdir::Error),

    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid metadata pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.into(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Scan `root` and (over)write `<root>/<manifest_file>`.
pub fn generate(root: &Path, options: &ManifestOptions) -> Result<Manifest, ManifestError> {
    tracing::info!(root = %root.display(), "scanning for HTML files");
    let apps = scan(root, options)?;
    tracing::info!(count = apps.len(), "found apps");

    let manifest = Manifest {
        generated: Utc::now().trunc_subsecs(3),
        apps,
    };
    let target = root.join(&options.manifest_file);
    write_manifest(&target, &manifest)?;

    tracing::info!(
        path = %target.display(),
        apps = manifest.apps.len(),
        "generated manifest",
    );
    Ok(manifest)
}

/// Discover pages under `root` without writing anything.
///
/// Entries come back sorted by path so repeated runs produce the same order
/// (and therefore the same default icons).
pub fn scan(root: &Path, options: &ManifestOptions) -> Result<Vec<AppEntry>, ManifestError> {
    let patterns = MetadataPatterns::new()?;
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !options.excludes(&entry.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(".html") {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        files.push(relative);
    }

    let apps = files
        .iter()
        .enumerate()
        .map(|(index, relative)| {
            let metadata = patterns.extract(&root.join(relative));
            let file_name = relative
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let entry = AppEntry {
                name: metadata
                    .title
                    .unwrap_or_else(|| app_name_from_file(&file_name)),
                file: to_slash(relative),
                description: metadata
                    .description
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                icon: metadata
                    .icon
                    .unwrap_or_else(|| DEFAULT_ICONS[index % DEFAULT_ICONS.len()].to_string()),
            };
            tracing::debug!(name = %entry.name, file = %entry.file, "manifest entry");
            entry
        })
        .collect();

    Ok(apps)
}

/// `"color-picker_pro.html"` → `"Color Picker Pro"`.
pub fn app_name_from_file(file_name: &str) -> String {
    file_name
        .replacen(".html", "", 1)
        .replace(['-', '_'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Metadata extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
struct PageMetadata {
    title: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

struct MetadataPatterns {
    title: Regex,
    description: Regex,
    icon: Regex,
}

impl MetadataPatterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            title: Regex::new(r"(?i)<title>(.*?)</title>")?,
            description: Regex::new(
                r#"(?i)<meta\s+name=["']description["']\s+content=["'](.*?)["']"#,
            )?,
            icon: Regex::new(r#"(?i)<meta\s+name=["']app-icon["']\s+content=["'](.*?)["']"#)?,
        })
    }

    /// Unreadable pages simply have no metadata.
    fn extract(&self, path: &Path) -> PageMetadata {
        match std::fs::read_to_string(path) {
            Ok(content) => self.extract_from(&content),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "unreadable page");
                PageMetadata::default()
            }
        }
    }

    fn extract_from(&self, content: &str) -> PageMetadata {
        let capture = |re: &Regex| {
            re.captures(content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .filter(|value| !value.is_empty())
        };
        PageMetadata {
            title: capture(&self.title),
            description: capture(&self.description),
            icon: capture(&self.icon),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

mod millis_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        at: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write through a hidden temp file so watchers never see a half-written manifest.
fn write_manifest(target: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    let json = serde_json::to_string_pretty(manifest)?;
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string());
    let tmp = target.with_file_name(format!(".{file_name}.tmp"));

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, target) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(target, e));
    }
    Ok(())
}
