//! Scripted stand-ins for the shell runner and manifest generator.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::Instant;

use autosync_core::AutoSyncConfig;
use autosync_daemon::{
    is_nothing_to_commit, CommandError, CommandRunner, DaemonError, ManifestGenerator,
    SyncOrchestrator, SyncState,
};

/// Shared, ordered record of every external call.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(Instant, String)>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().expect("log lock").push((Instant::now(), call.into()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.0
            .lock()
            .expect("log lock")
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    /// Calls cut to their first two words ("git commit -m ..." → "git commit").
    pub fn verbs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| call.split_whitespace().take(2).collect::<Vec<_>>().join(" "))
            .collect()
    }

    pub fn first_call_at(&self) -> Option<Instant> {
        self.0.lock().expect("log lock").first().map(|(at, _)| *at)
    }
}

/// A scripted failure: non-zero exit with this diagnostic text.
#[derive(Debug, Clone)]
pub struct Failure {
    pub prefix: &'static str,
    pub diagnostic: &'static str,
}

/// Replies to git commands from a script and records every call.
pub struct FakeRunner {
    pub log: CallLog,
    pub status: Mutex<String>,
    pub failures: Mutex<Vec<Failure>>,
    /// When set, `git push` waits for a permit before returning.
    pub push_gate: Option<Arc<Notify>>,
}

impl FakeRunner {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            status: Mutex::new(" M a.txt\n".to_string()),
            failures: Mutex::new(Vec::new()),
            push_gate: None,
        }
    }

    pub fn clean(self) -> Self {
        *self.status.lock().expect("status lock") = String::new();
        self
    }

    pub fn failing(self, prefix: &'static str, diagnostic: &'static str) -> Self {
        self.failures
            .lock()
            .expect("failures lock")
            .push(Failure { prefix, diagnostic });
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.push_gate = Some(gate);
        self
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, command: &str) -> Result<String, CommandError> {
        self.log.push(command);

        if command.starts_with("git push") {
            if let Some(gate) = &self.push_gate {
                gate.notified().await;
            }
        }

        let failure = self
            .failures
            .lock()
            .expect("failures lock")
            .iter()
            .find(|f| command.starts_with(f.prefix))
            .cloned();
        if let Some(failure) = failure {
            // Same contract as the shell runner's default classifier.
            if is_nothing_to_commit(failure.diagnostic) {
                return Ok(failure.diagnostic.to_string());
            }
            return Err(CommandError::Failed {
                command: command.to_string(),
                code: Some(1),
                output: failure.diagnostic.to_string(),
            });
        }

        if command.starts_with("git status") {
            return Ok(self.status.lock().expect("status lock").clone());
        }
        Ok(String::new())
    }
}

/// Records "manifest" into the shared log; optionally fails.
pub struct FakeManifest {
    pub log: CallLog,
    pub fail: bool,
}

#[async_trait]
impl ManifestGenerator for FakeManifest {
    async fn regenerate(&self) -> Result<(), DaemonError> {
        self.log.push("manifest");
        if self.fail {
            return Err(DaemonError::Task("generator crashed".to_string()));
        }
        Ok(())
    }
}

pub fn orchestrator(runner: FakeRunner, manifest_fails: bool) -> Arc<SyncOrchestrator> {
    let log = runner.log.clone();
    let config = AutoSyncConfig {
        remote_url: Some("https://example.github.io".to_string()),
        ..AutoSyncConfig::default()
    };
    Arc::new(SyncOrchestrator::new(
        Arc::new(SyncState::new()),
        Arc::new(runner),
        Arc::new(FakeManifest {
            log,
            fail: manifest_fails,
        }),
        &config,
    ))
}
