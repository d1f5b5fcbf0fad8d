//! Autosync — watch a working tree and push every quiet-period batch of changes.
//!
//! # Usage
//!
//! ```text
//! autosync watch [--root <dir>] [--config <file>] [--debounce-ms <ms>] [--remote-url <url>] [--no-manifest]
//! autosync sync [--root <dir>] [--manifest] [--json]
//! autosync manifest [--root <dir>] [--json]
//! autosync init [--root <dir>] [--remote-url <url>] [--force]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{init::InitArgs, manifest::ManifestArgs, sync::SyncArgs, watch::WatchArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "autosync",
    version,
    about = "Commit and push a working tree automatically as files change",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch the root and sync after every quiet period (Ctrl-C to stop).
    Watch(WatchArgs),

    /// Run one sync cycle now.
    Sync(SyncArgs),

    /// Regenerate the app manifest once.
    Manifest(ManifestArgs),

    /// Write a default .autosync.yaml into the root.
    Init(InitArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Watch(args) => args.run(),
        Commands::Sync(args) => args.run(),
        Commands::Manifest(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}
