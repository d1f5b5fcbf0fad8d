//! Watcher runtime: change filter → debounce scheduler → sync orchestrator →
//! command runner.

mod error;
pub mod manifest;
pub mod orchestrator;
pub mod runner;
mod runtime;
pub mod scheduler;
pub mod state;

pub use error::{CommandError, DaemonError};
pub use manifest::{BuiltinManifest, CommandManifest, ManifestGenerator};
pub use orchestrator::SyncOrchestrator;
pub use runner::{is_nothing_to_commit, CommandRunner, FailureClassifier, ShellRunner};
pub use runtime::{
    build_orchestrator, change_events, dispatch, init_tracing, run, start_blocking, watch,
};
pub use scheduler::DebounceScheduler;
pub use state::{ProcessingGuard, SyncState};
