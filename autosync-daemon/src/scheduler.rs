//! Debounced sync scheduling.
//!
//! The scheduler owns a single timer slot. Every [`DebounceScheduler::notify`]
//! aborts whatever timer is in the slot and arms a new one, so only the most
//! recent deadline ever fires. When it does, the sync run is spawned as its
//! own task: later notifications cancel timers, never in-flight runs.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use autosync_core::SyncOutcome;

use crate::orchestrator::SyncOrchestrator;
use crate::state::SyncState;

pub struct DebounceScheduler {
    state: Arc<SyncState>,
    orchestrator: Arc<SyncOrchestrator>,
    quiet: Duration,
    slot: Mutex<Option<JoinHandle<()>>>,
    outcomes: Option<mpsc::UnboundedSender<SyncOutcome>>,
}

impl DebounceScheduler {
    pub fn new(orchestrator: Arc<SyncOrchestrator>, quiet: Duration) -> Self {
        Self {
            state: orchestrator.state().clone(),
            orchestrator,
            quiet,
            slot: Mutex::new(None),
            outcomes: None,
        }
    }

    /// Forward every finished run's outcome to `tx`.
    pub fn with_outcomes(mut self, tx: mpsc::UnboundedSender<SyncOutcome>) -> Self {
        self.outcomes = Some(tx);
        self
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// Record a qualifying change and restart the quiet-period countdown,
    /// measured from this call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn notify(&self, is_manifest_trigger: bool) {
        self.state.mark_manifest_refresh(is_manifest_trigger);

        let deadline = Instant::now() + self.quiet;
        let timer = tokio::spawn(fire_at(
            deadline,
            self.state.clone(),
            self.orchestrator.clone(),
            self.outcomes.clone(),
        ));

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(timer) {
            previous.abort();
        }
    }

    /// True while a timer is armed and has not fired yet.
    pub fn is_armed(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Disarm the pending timer, if any. In-flight runs are unaffected.
    pub fn cancel(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = slot.take() {
            timer.abort();
        }
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn fire_at(
    deadline: Instant,
    state: Arc<SyncState>,
    orchestrator: Arc<SyncOrchestrator>,
    outcomes: Option<mpsc::UnboundedSender<SyncOutcome>>,
) {
    tokio::time::sleep_until(deadline).await;

    // No await between here and the spawn: once the deadline passes the
    // trigger is handed to exactly one run, even if this timer is aborted.
    let manifest_trigger = state.take_manifest_refresh();
    tokio::spawn(async move {
        let outcome = orchestrator.run_sync(manifest_trigger).await;
        if outcome.skipped {
            debug!("sync already in progress; debounced run absorbed");
            state.mark_manifest_refresh(manifest_trigger);
        }
        if let Some(tx) = outcomes {
            let _ = tx.send(outcome);
        }
    });
}
