use std::path::PathBuf;

use thiserror::Error;

/// Failure of one external command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {output}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        /// Combined diagnostic output (stderr, then stdout).
        output: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Error surface for the watcher runtime and sync pipeline.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("config error: {0}")]
    Config(#[from] autosync_core::ConfigError),

    #[error("command error: {0}")]
    Command(#[from] CommandError),

    #[error("manifest error: {0}")]
    Manifest(#[from] autosync_manifest::ManifestError),

    #[error("background task failed: {0}")]
    Task(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
