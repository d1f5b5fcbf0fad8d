use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn autosync_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("autosync"));
    cmd.current_dir(root).env("RUST_LOG", "off");
    cmd
}

fn write_page(root: &Path, relative: &str, html: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create page dir");
    }
    fs::write(path, html).expect("write page");
}

#[test]
fn help_lists_every_subcommand() {
    let root = TempDir::new().expect("root");
    autosync_cmd(root.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("watch"))
        .stdout(contains("sync"))
        .stdout(contains("manifest"))
        .stdout(contains("init"));
}

#[test]
fn init_writes_config_and_refuses_to_overwrite() {
    let root = TempDir::new().expect("root");

    autosync_cmd(root.path())
        .args(["init", "--remote-url", "https://example.test/site"])
        .assert()
        .success()
        .stdout(contains(".autosync.yaml"));

    let written = fs::read_to_string(root.path().join(".autosync.yaml")).expect("config");
    assert!(written.contains("https://example.test/site"), "got: {written}");
    assert!(written.contains("debounce_ms: 2000"), "got: {written}");

    autosync_cmd(root.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(contains("already exists"));

    autosync_cmd(root.path())
        .args(["init", "--force"])
        .assert()
        .success();
    let rewritten = fs::read_to_string(root.path().join(".autosync.yaml")).expect("config");
    assert!(!rewritten.contains("https://example.test/site"));
}

#[test]
fn manifest_lists_pages_and_writes_file() {
    let root = TempDir::new().expect("root");
    write_page(
        root.path(),
        "timer.html",
        "<title>Pomodoro</title><meta name=\"description\" content=\"Focus timer\">",
    );
    write_page(root.path(), "tools/color-picker.html", "<p>no metadata</p>");
    write_page(root.path(), "index.html", "<title>Home</title>");

    autosync_cmd(root.path())
        .args(["manifest", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("Generated manifest with 2 app(s)"))
        .stdout(contains("Pomodoro"))
        .stdout(contains("Color Picker"));

    let written = fs::read_to_string(root.path().join("apps-manifest.json")).expect("manifest");
    let manifest: serde_json::Value = serde_json::from_str(&written).expect("json");
    let files: Vec<&str> = manifest["apps"]
        .as_array()
        .expect("apps")
        .iter()
        .map(|app| app["file"].as_str().expect("file"))
        .collect();
    assert_eq!(files, vec!["timer.html", "tools/color-picker.html"]);
}

#[test]
fn manifest_json_output_is_parseable() {
    let root = TempDir::new().expect("root");
    write_page(root.path(), "clock.html", "<title>Clock</title>");

    let output = autosync_cmd(root.path())
        .args(["manifest", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let manifest: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(manifest["apps"][0]["name"], "Clock");
}

#[test]
fn sync_outside_a_repository_reports_failure() {
    let root = TempDir::new().expect("root");
    fs::write(root.path().join("a.txt"), "x").expect("write");

    autosync_cmd(root.path())
        .arg("sync")
        .assert()
        .failure()
        .stdout(contains("sync failed"))
        .stderr(contains("git status --porcelain"));
}

#[test]
fn invalid_config_is_rejected() {
    let root = TempDir::new().expect("root");
    fs::write(root.path().join(".autosync.yaml"), "debounce_ms: 0\n").expect("write");

    autosync_cmd(root.path())
        .arg("manifest")
        .assert()
        .failure()
        .stderr(contains("failed to load config"));
}

#[test]
fn init_does_not_accept_a_config_path() {
    let root = TempDir::new().expect("root");

    autosync_cmd(root.path())
        .args(["init", "--config", "custom.yaml"])
        .assert()
        .failure()
        .stderr(contains("--config"));

    assert!(!root.path().join("custom.yaml").exists());
    assert!(!root.path().join(".autosync.yaml").exists());
}

#[test]
fn manifest_honours_a_config_path() {
    let root = TempDir::new().expect("root");
    fs::write(root.path().join("custom.yaml"), "manifest:\n  file: listing.json\n")
        .expect("write config");
    write_page(root.path(), "clock.html", "<title>Clock</title>");

    autosync_cmd(root.path())
        .args(["manifest", "--config", "custom.yaml"])
        .assert()
        .success()
        .stdout(contains("listing.json"));
    assert!(root.path().join("listing.json").exists());
}
