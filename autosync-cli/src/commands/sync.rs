//! `autosync sync` — one sync cycle, now.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use autosync_core::SyncOutcome;
use autosync_daemon::{build_orchestrator, init_tracing, CommandRunner, ShellRunner};

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub root: ConfigArgs,

    /// Regenerate the manifest before committing.
    #[arg(long)]
    pub manifest: bool,

    /// Emit the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = self.root.load_config()?;
        if !self.json {
            init_tracing();
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;

        let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::new(&config.root));
        let orchestrator = build_orchestrator(&config, &config.root, runner);
        let outcome = runtime.block_on(orchestrator.run_sync(self.manifest));

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?
            );
        } else {
            print_outcome(&outcome, config.remote_url.as_deref());
        }

        if let Some(error) = outcome.error {
            bail!("sync failed: {error}");
        }
        Ok(())
    }
}

fn print_outcome(outcome: &SyncOutcome, remote_url: Option<&str>) {
    if outcome.manifest_regenerated {
        println!("{} manifest regenerated", "✓".green());
    }
    if !outcome.is_success() {
        println!("{} sync failed", "✗".red());
    } else if outcome.committed {
        println!("{} synced", "✓".green());
        if let Some(url) = remote_url {
            println!("  View at: {url}");
        }
    } else {
        println!("{} no changes to sync", "✓".green());
    }
}
