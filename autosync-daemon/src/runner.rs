//! External command execution.
//!
//! Every git (and optional manifest) invocation goes through a
//! [`CommandRunner`]. The runner is the single place where a failed command
//! can be re-classified as success based on its output.

use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::CommandError;

/// Marker emitted by git when staging/committing finds no diff.
pub const NOTHING_TO_COMMIT: &str = "nothing to commit";

/// Decides whether a failed command's diagnostic output is benign.
pub type FailureClassifier = fn(&str) -> bool;

/// Default classifier: a commit race that left nothing to commit is fine.
pub fn is_nothing_to_commit(diagnostic: &str) -> bool {
    diagnostic.contains(NOTHING_TO_COMMIT)
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` and return its output.
    async fn run(&self, command: &str) -> Result<String, CommandError>;
}

/// Runs commands through the platform shell in a fixed working directory.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    cwd: PathBuf,
    classifier: FailureClassifier,
}

impl ShellRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            classifier: is_nothing_to_commit,
        }
    }

    pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<String, CommandError> {
        let (shell, flag) = shell();
        debug!(cmd = %command, cwd = %self.cwd.display(), "running command");

        let output = Command::new(shell)
            .arg(flag)
            .arg(command)
            .current_dir(&self.cwd)
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        settle(command, &output, self.classifier)
    }
}

/// Turn a finished process into the runner's result.
///
/// Output is stdout, or stderr when stdout is empty. A non-zero exit is an
/// error unless `classifier` accepts the diagnostic text, which is then
/// returned as the output.
pub(crate) fn settle(
    command: &str,
    output: &Output,
    classifier: FailureClassifier,
) -> Result<String, CommandError> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if output.status.success() {
        let text = if stdout.is_empty() { stderr } else { stdout };
        return Ok(text.into_owned());
    }

    let diagnostic = match (stderr.trim().is_empty(), stdout.trim().is_empty()) {
        (false, false) => format!("{}\n{}", stderr.trim_end(), stdout.trim_end()),
        (false, true) => stderr.trim_end().to_string(),
        _ => stdout.trim_end().to_string(),
    };

    if classifier(&diagnostic) {
        debug!(cmd = %command, "benign command failure treated as success");
        return Ok(diagnostic);
    }

    Err(CommandError::Failed {
        command: command.to_string(),
        code: output.status.code(),
        output: diagnostic,
    })
}

#[cfg(unix)]
fn shell() -> (&'static str, &'static str) {
    ("/bin/sh", "-c")
}

#[cfg(windows)]
fn shell() -> (&'static str, &'static str) {
    ("cmd.exe", "/C")
}

/// Quote `arg` so the platform shell passes it through as one literal word.
#[cfg(unix)]
pub fn quote_arg(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(windows)]
pub fn quote_arg(arg: &str) -> String {
    format!("\"{}\"", arg.replace('"', "\\\""))
}
