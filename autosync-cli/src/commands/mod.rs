pub mod init;
pub mod manifest;
pub mod sync;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use autosync_core::{config, AutoSyncConfig};

/// Root selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct RootArgs {
    /// Directory to watch and sync (defaults to the current directory).
    #[arg(long, short = 'r', value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Root selection plus an optional config file, for commands that read config.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub root: RootArgs,

    /// Config file to use instead of <root>/.autosync.yaml.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl RootArgs {
    pub fn resolve_root(&self) -> Result<PathBuf> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("could not determine current directory")?,
        };
        root.canonicalize()
            .with_context(|| format!("cannot resolve root '{}'", root.display()))
    }
}

impl ConfigArgs {
    pub fn load_config(&self) -> Result<AutoSyncConfig> {
        let root = self.root.resolve_root()?;
        let loaded = match &self.config {
            Some(path) => config::load_from(path, &root),
            None => config::load_at(&root),
        };
        loaded.with_context(|| format!("failed to load config for '{}'", root.display()))
    }
}
