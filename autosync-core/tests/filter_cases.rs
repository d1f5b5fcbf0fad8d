//! Table-driven change filter cases against the default configuration.

use std::path::PathBuf;

use autosync_core::{AutoSyncConfig, ChangeFilter, FilterDecision};
use rstest::rstest;

fn default_filter() -> ChangeFilter {
    ChangeFilter::from_config(&AutoSyncConfig::default())
}

#[rstest]
#[case::git_index(".git/index", FilterDecision::Ignore)]
#[case::git_object(".git/objects/ab/cdef", FilterDecision::Ignore)]
#[case::nested_git_dir("vendor/lib/.git/HEAD", FilterDecision::Ignore)]
#[case::config_file(".autosync.yaml", FilterDecision::Ignore)]
#[case::manifest_file("apps-manifest.json", FilterDecision::Ignore)]
#[case::dotted_manifest_path("./apps-manifest.json", FilterDecision::Ignore)]
#[case::hidden_file(".DS_Store", FilterDecision::Ignore)]
#[case::hidden_leaf_in_dir("pages/.draft.html", FilterDecision::Ignore)]
#[case::empty_path("", FilterDecision::Ignore)]
#[case::plain_text("a.txt", FilterDecision::Relevant)]
#[case::nested_text("docs/guide.md", FilterDecision::Relevant)]
#[case::nested_manifest_name("sub/apps-manifest.json", FilterDecision::Relevant)]
#[case::html_page("b.html", FilterDecision::RelevantManifestTrigger)]
#[case::html_upper("GAME.HTML", FilterDecision::RelevantManifestTrigger)]
#[case::nested_html("apps/timer/index.html", FilterDecision::RelevantManifestTrigger)]
#[case::htm_is_not_html("legacy.htm", FilterDecision::Relevant)]
fn classify_default_paths(#[case] path: &str, #[case] expected: FilterDecision) {
    let path = PathBuf::from(path);
    assert_eq!(default_filter().classify(Some(path.as_path())), expected, "path: {}", path.display());
}

#[test]
fn missing_path_is_ignored() {
    assert_eq!(default_filter().classify(None), FilterDecision::Ignore);
}

#[rstest]
#[case("node_modules/pkg/index.js", FilterDecision::Ignore)]
#[case("deploy.sh", FilterDecision::Ignore)]
#[case("notes.markdown", FilterDecision::RelevantManifestTrigger)]
#[case("page.html", FilterDecision::Relevant)]
fn classify_custom_config(#[case] path: &str, #[case] expected: FilterDecision) {
    let mut config = AutoSyncConfig::default();
    config.ignore_dirs.push("node_modules".to_string());
    config.control_files.push("deploy.sh".to_string());
    config.manifest.trigger_extensions = vec![".markdown".to_string()];

    let filter = ChangeFilter::from_config(&config);
    assert_eq!(filter.classify(Some(PathBuf::from(path).as_path())), expected);
}
