//! Process-wide sync state.
//!
//! One [`SyncState`] exists per watcher. The orchestrator owns the
//! `processing` flag, the scheduler folds trigger events into
//! `pending_manifest_refresh`, and both are atomics because notify callbacks
//! and timer tasks may run on different runtime threads.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SyncState {
    processing: AtomicBool,
    pending_manifest_refresh: AtomicBool,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly while a sync run is in flight.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Claim the run slot. `None` means another run holds it.
    ///
    /// The slot is released when the returned guard drops, including on
    /// early return and unwinding.
    pub fn try_begin(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard { state: self })
    }

    /// OR a manifest-trigger classification into the pending flag.
    pub fn mark_manifest_refresh(&self, trigger: bool) {
        if trigger {
            self.pending_manifest_refresh.store(true, Ordering::Release);
        }
    }

    /// Read and clear the pending flag.
    pub fn take_manifest_refresh(&self) -> bool {
        self.pending_manifest_refresh.swap(false, Ordering::AcqRel)
    }

    pub fn pending_manifest_refresh(&self) -> bool {
        self.pending_manifest_refresh.load(Ordering::Acquire)
    }
}

/// Holds the run slot of a [`SyncState`] until dropped.
#[derive(Debug)]
pub struct ProcessingGuard<'a> {
    state: &'a SyncState,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.state.processing.store(false, Ordering::Release);
    }
}
