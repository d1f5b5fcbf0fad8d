//! `autosync manifest` — regenerate the app manifest once.

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use autosync_manifest::{generate, ManifestOptions};

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub root: ConfigArgs,

    /// Emit the generated manifest as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "description")]
    description: String,
}

impl ManifestArgs {
    pub fn run(self) -> Result<()> {
        let config = self.root.load_config()?;
        let options = ManifestOptions::from_settings(&config.manifest);
        let manifest = generate(&config.root, &options).with_context(|| {
            format!("failed to generate manifest in '{}'", config.root.display())
        })?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?
            );
            return Ok(());
        }

        println!("✓ Generated manifest with {} app(s)", manifest.apps.len());
        println!("  Saved to: {}", options.manifest_file);
        if manifest.apps.is_empty() {
            return Ok(());
        }

        let rows: Vec<AppRow> = manifest
            .apps
            .into_iter()
            .map(|app| AppRow {
                icon: app.icon,
                name: app.name,
                file: app.file,
                description: app.description,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
