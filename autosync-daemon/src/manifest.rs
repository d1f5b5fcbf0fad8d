//! Manifest regeneration as seen by the orchestrator: a black box that either
//! succeeds or fails.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use autosync_core::AutoSyncConfig;
use autosync_manifest::ManifestOptions;

use crate::error::DaemonError;
use crate::runner::CommandRunner;

#[async_trait]
pub trait ManifestGenerator: Send + Sync {
    async fn regenerate(&self) -> Result<(), DaemonError>;
}

/// Runs the in-process generator on a blocking thread.
#[derive(Debug, Clone)]
pub struct BuiltinManifest {
    root: PathBuf,
    options: ManifestOptions,
}

impl BuiltinManifest {
    pub fn new(root: impl Into<PathBuf>, options: ManifestOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }
}

#[async_trait]
impl ManifestGenerator for BuiltinManifest {
    async fn regenerate(&self) -> Result<(), DaemonError> {
        let root = self.root.clone();
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || autosync_manifest::generate(&root, &options))
            .await
            .map_err(|err| DaemonError::Task(format!("manifest join error: {err}")))??;
        Ok(())
    }
}

/// Runs a user-supplied shell command; its exit status is the result.
pub struct CommandManifest {
    runner: Arc<dyn CommandRunner>,
    command: String,
}

impl CommandManifest {
    pub fn new(runner: Arc<dyn CommandRunner>, command: impl Into<String>) -> Self {
        Self {
            runner,
            command: command.into(),
        }
    }
}

#[async_trait]
impl ManifestGenerator for CommandManifest {
    async fn regenerate(&self) -> Result<(), DaemonError> {
        self.runner.run(&self.command).await?;
        Ok(())
    }
}

/// Pick the generator configured for `root`.
pub fn from_config(
    config: &AutoSyncConfig,
    root: impl Into<PathBuf>,
    runner: Arc<dyn CommandRunner>,
) -> Arc<dyn ManifestGenerator> {
    match &config.manifest.command {
        Some(command) => Arc::new(CommandManifest::new(runner, command.clone())),
        None => Arc::new(BuiltinManifest::new(
            root,
            ManifestOptions::from_settings(&config.manifest),
        )),
    }
}
