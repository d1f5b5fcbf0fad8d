//! One sync run: optional manifest refresh, status check, add/commit/push.
//!
//! ```text
//! Idle ──try_begin──▶ Processing ──▶ [ManifestRefresh] ──▶ StatusCheck
//!  ▲                                                          │
//!  │                         empty status ◀───────────────────┤
//!  └──── guard dropped ◀──── Commit ──▶ Push ◀────────────────┘
//! ```
//!
//! Failures never escape a run: they are logged and reported in the returned
//! [`SyncOutcome`], and the guard releases the run slot on every path.

use std::sync::Arc;

use chrono::Local;
use tracing::{error, info, warn};

use autosync_core::{AutoSyncConfig, SyncOutcome};

use crate::error::CommandError;
use crate::manifest::ManifestGenerator;
use crate::runner::{quote_arg, CommandRunner};
use crate::state::SyncState;

pub const GIT_STATUS: &str = "git status --porcelain";
pub const GIT_ADD: &str = "git add .";
pub const GIT_PUSH: &str = "git push";

/// Human-readable local time embedded in commit messages.
const COMMIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SyncOrchestrator {
    state: Arc<SyncState>,
    runner: Arc<dyn CommandRunner>,
    manifest: Arc<dyn ManifestGenerator>,
    config: AutoSyncConfig,
}

impl SyncOrchestrator {
    pub fn new(
        state: Arc<SyncState>,
        runner: Arc<dyn CommandRunner>,
        manifest: Arc<dyn ManifestGenerator>,
        config: &AutoSyncConfig,
    ) -> Self {
        Self {
            state,
            runner,
            manifest,
            config: config.clone(),
        }
    }

    pub fn state(&self) -> &Arc<SyncState> {
        &self.state
    }

    /// Run one sync cycle.
    ///
    /// Returns immediately with [`SyncOutcome::skipped`] when another run is
    /// in flight. `committed` is true when the add/commit/push sequence ran to
    /// the end, including the case where the commit found nothing to commit.
    pub async fn run_sync(&self, manifest_trigger: bool) -> SyncOutcome {
        let Some(_guard) = self.state.try_begin() else {
            return SyncOutcome::skipped();
        };

        info!(manifest = manifest_trigger, "syncing changes");
        let mut outcome = SyncOutcome::default();

        if manifest_trigger {
            match self.manifest.regenerate().await {
                Ok(()) => {
                    info!("manifest regenerated");
                    outcome.manifest_regenerated = true;
                }
                Err(err) => {
                    warn!(error = %err, "manifest generation failed; continuing with sync");
                }
            }
        }

        match self.commit_and_push().await {
            Ok(true) => {
                outcome.committed = true;
                match &self.config.remote_url {
                    Some(url) => info!(url = %url, "synced successfully"),
                    None => info!("synced successfully"),
                }
            }
            Ok(false) => info!("no changes to sync"),
            Err(err) => {
                error!(error = %err, "sync failed");
                outcome.error = Some(err.to_string());
            }
        }

        outcome
    }

    /// `Ok(false)` when the working tree is clean.
    async fn commit_and_push(&self) -> Result<bool, CommandError> {
        let status = self.runner.run(GIT_STATUS).await?;
        if status.trim().is_empty() {
            return Ok(false);
        }

        self.runner.run(GIT_ADD).await?;

        let timestamp = Local::now().format(COMMIT_TIMESTAMP_FORMAT).to_string();
        let message = self.config.commit_message(&timestamp);
        self.runner.run(&commit_command(&message)).await?;

        self.runner.run(GIT_PUSH).await?;
        Ok(true)
    }
}

/// `git commit -m <message>`, with the message quoted for the shell.
pub fn commit_command(message: &str) -> String {
    format!("git commit -m {}", quote_arg(message))
}
