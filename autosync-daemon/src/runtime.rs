use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use autosync_core::{AutoSyncConfig, ChangeEvent, ChangeFilter, ChangeKind, FilterDecision};

use crate::error::{io_err, DaemonError};
use crate::manifest;
use crate::orchestrator::SyncOrchestrator;
use crate::runner::{CommandRunner, ShellRunner};
use crate::scheduler::DebounceScheduler;
use crate::state::SyncState;

/// Start the watcher and block the current thread until Ctrl-C.
pub fn start_blocking(config: AutoSyncConfig) -> Result<(), DaemonError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config))
}

/// Watch with the shell runner until Ctrl-C.
pub async fn run(config: AutoSyncConfig) -> Result<(), DaemonError> {
    let root = canonical_root(&config.root)?;
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::new(&root));
    watch(config, runner, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "ctrl-c handler failed");
        }
    })
    .await?;
    tracing::info!("auto-sync stopped");
    Ok(())
}

/// Watch `config.root` and sync through `runner` until `shutdown` resolves.
///
/// In-flight sync runs are not waited for.
pub async fn watch<F>(
    config: AutoSyncConfig,
    runner: Arc<dyn CommandRunner>,
    shutdown: F,
) -> Result<(), DaemonError>
where
    F: Future<Output = ()>,
{
    config.validate()?;
    let root = canonical_root(&config.root)?;
    let filter = ChangeFilter::from_config(&config);
    let orchestrator = Arc::new(build_orchestrator(&config, &root, runner));
    let scheduler = DebounceScheduler::new(orchestrator, config.debounce());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut watcher: RecommendedWatcher = recommended_watcher(move |event| {
        let _ = event_tx.send(event);
    })?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    tracing::info!(
        root = %root.display(),
        debounce_ms = scheduler.quiet_interval().as_millis() as u64,
        "auto-sync started; watching for file changes",
    );

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                let event = match event {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "watcher event error");
                        continue;
                    }
                };
                for change in change_events(&root, event) {
                    dispatch(&filter, &scheduler, &change);
                }
            }
        }
    }

    drop(watcher);
    Ok(())
}

/// Wire the orchestrator for `root` with the configured manifest generator.
pub fn build_orchestrator(
    config: &AutoSyncConfig,
    root: &Path,
    runner: Arc<dyn CommandRunner>,
) -> SyncOrchestrator {
    let generator = manifest::from_config(config, root, runner.clone());
    SyncOrchestrator::new(Arc::new(SyncState::new()), runner, generator, config)
}

/// Filter one change and, if relevant, restart the debounce countdown.
pub fn dispatch(
    filter: &ChangeFilter,
    scheduler: &DebounceScheduler,
    change: &ChangeEvent,
) -> FilterDecision {
    let decision = filter.classify_event(change);
    if decision.is_relevant() {
        if let Some(path) = &change.path {
            tracing::info!(path = %path.display(), kind = %change.kind, "detected change");
        }
        scheduler.notify(decision.is_manifest_trigger());
    }
    decision
}

/// Translate a notify event into root-relative change events.
///
/// Access-only events are dropped: git reads the tree on every sync and must
/// not re-trigger one. Paths outside `root` become pathless events.
pub fn change_events(root: &Path, event: Event) -> Vec<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Access(_) => return Vec::new(),
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Remove(_) => ChangeKind::Renamed,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Any | EventKind::Other => ChangeKind::Unknown,
    };

    if event.paths.is_empty() {
        return vec![ChangeEvent::pathless(kind)];
    }

    event
        .paths
        .iter()
        .map(|path| match path.strip_prefix(root) {
            Ok(relative) => ChangeEvent::new(kind, relative),
            Err(_) => ChangeEvent::pathless(kind),
        })
        .collect()
}

/// Canonicalize so that event paths (which arrive as real paths, e.g.
/// /private/var/... on macOS) strip cleanly.
fn canonical_root(root: &Path) -> Result<PathBuf, DaemonError> {
    fs::canonicalize(root).map_err(|e| io_err(root, e))
}

pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind, RenameMode};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn paths_are_made_root_relative() {
        let changes = change_events(
            Path::new("/srv/site"),
            event(
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                &["/srv/site/apps/timer.html"],
            ),
        );
        assert_eq!(
            changes,
            vec![ChangeEvent::new(ChangeKind::Modified, "apps/timer.html")]
        );
    }

    #[test]
    fn access_events_are_dropped() {
        let changes = change_events(
            Path::new("/srv/site"),
            event(EventKind::Access(AccessKind::Read), &["/srv/site/a.txt"]),
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn kinds_map_onto_change_kinds() {
        let root = Path::new("/r");
        let kind_of = |kind: EventKind| change_events(root, event(kind, &["/r/x"]))[0].kind;

        assert_eq!(kind_of(EventKind::Create(CreateKind::File)), ChangeKind::Created);
        assert_eq!(
            kind_of(EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            ChangeKind::Renamed
        );
        assert_eq!(kind_of(EventKind::Remove(RemoveKind::File)), ChangeKind::Renamed);
        assert_eq!(kind_of(EventKind::Modify(ModifyKind::Any)), ChangeKind::Modified);
        assert_eq!(kind_of(EventKind::Other), ChangeKind::Unknown);
    }

    #[test]
    fn pathless_and_foreign_events_carry_no_path() {
        let root = Path::new("/srv/site");
        let none = change_events(root, event(EventKind::Any, &[]));
        assert_eq!(none, vec![ChangeEvent::pathless(ChangeKind::Unknown)]);

        let foreign = change_events(
            root,
            event(EventKind::Create(CreateKind::File), &["/elsewhere/a.txt"]),
        );
        assert_eq!(foreign, vec![ChangeEvent::pathless(ChangeKind::Created)]);
    }
}
