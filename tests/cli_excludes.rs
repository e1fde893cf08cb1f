mod common;

use assert_cmd::Command;
use common::{sample_project, TestProject};
use predicates::prelude::*;

#[test]
fn excludes_merge_config_and_gitignore() {
    let project = sample_project();

    let output = Command::new(TestProject::bin())
        .args(["--json", "excludes"])
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let patterns: Vec<&str> = json["patterns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert!(patterns.contains(&"**/node_modules"));
    assert!(patterns.contains(&"**/.git"));
    assert!(patterns.contains(&"**/dist"));
    assert!(!patterns.iter().any(|p| p.contains("keep.log")));

    let glob = json["glob"].as_str().unwrap();
    assert!(glob.starts_with('{') && glob.ends_with('}'));
    assert_eq!(json["count"], patterns.len());
}

#[test]
fn excludes_quiet_prints_glob_only() {
    let project = TestProject::new();
    project.write_file(
        ".goto-anything/config.toml",
        "[exclude]\nuse_ignore_files = false\n\n[exclude.files]\n\"**/target\" = true\n\n[exclude.search]\n",
    );

    Command::new(TestProject::bin())
        .args(["--quiet", "excludes"])
        .arg(project.path())
        .assert()
        .success()
        .stdout("{**/target}\n");
}

#[test]
fn excludes_keep_disabled_entries_by_default() {
    let project = TestProject::new();
    project.write_file(
        ".goto-anything/config.toml",
        "[exclude]\nuse_ignore_files = false\n\n[exclude.files]\n\"**/dist\" = false\n\n[exclude.search]\n",
    );

    Command::new(TestProject::bin())
        .args(["--quiet", "excludes"])
        .arg(project.path())
        .assert()
        .success()
        .stdout("{**/dist}\n");
}

#[test]
fn excludes_honor_disabled_when_asked() {
    let project = TestProject::new();
    project.write_file(
        ".goto-anything/config.toml",
        "[exclude]\nuse_ignore_files = false\nhonor_disabled = true\n\n[exclude.files]\n\"**/dist\" = false\n\n[exclude.search]\n",
    );

    Command::new(TestProject::bin())
        .arg("excludes")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing is excluded"));
}
