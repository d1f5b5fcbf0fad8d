//! `autosync init [--root <dir>] [--remote-url <url>] [--force]`

use anyhow::{Context, Result};
use clap::Args;

use autosync_core::config;

use super::RootArgs;

/// Write a default `.autosync.yaml`.
#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub root: RootArgs,

    /// URL printed after each successful push.
    #[arg(long, value_name = "URL")]
    pub remote_url: Option<String>,

    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let root = self.root.resolve_root()?;
        let mut cfg = config::AutoSyncConfig::for_root(&root);
        cfg.remote_url = self.remote_url;

        let path = config::save_at(&cfg, self.force)
            .with_context(|| format!("failed to write config in '{}'", root.display()))?;
        println!("✓ Wrote {}", path.display());
        Ok(())
    }
}
