//! Autosync core library — domain types, change filtering, configuration.
//!
//! Public API surface:
//! - [`types`] — change events, filter decisions, sync outcomes
//! - [`filter`] — [`ChangeFilter`], the per-event relevance decision
//! - [`config`] — [`AutoSyncConfig`] and its YAML loader
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod filter;
pub mod types;

pub use config::{AutoSyncConfig, ManifestSettings, CONFIG_FILE_NAME};
pub use error::ConfigError;
pub use filter::ChangeFilter;
pub use types::{ChangeEvent, ChangeKind, FilterDecision, SyncOutcome};
