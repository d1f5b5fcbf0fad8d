//! `autosync watch` — long-running watcher.

use anyhow::{Context, Result};
use clap::Args;

use autosync_daemon::start_blocking;

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub root: ConfigArgs,

    /// Quiet period in milliseconds before a batch of changes is synced.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// URL printed after each successful push.
    #[arg(long, value_name = "URL")]
    pub remote_url: Option<String>,

    /// Never regenerate the manifest, whatever changes.
    #[arg(long)]
    pub no_manifest: bool,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let mut config = self.root.load_config()?;
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
        if let Some(url) = self.remote_url {
            config.remote_url = Some(url);
        }
        if self.no_manifest {
            config.manifest.enabled = false;
        }
        config.validate().context("invalid watch options")?;

        println!("Press Ctrl+C to stop auto-sync");
        start_blocking(config).context("watcher exited with error")?;
        println!("auto-sync stopped");
        Ok(())
    }
}
