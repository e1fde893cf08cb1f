mod common;

use assert_cmd::Command;
use common::TestProject;
use predicates::prelude::*;

fn classify_json(project: &TestProject, query: &str) -> serde_json::Value {
    let output = Command::new(TestProject::bin())
        .args(["--json", "classify", query])
        .arg(project.path())
        .output()
        .expect("failed to run classify");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("classify output is not JSON")
}

#[test]
fn classify_splits_at_prefix() {
    let project = TestProject::new();

    let json = classify_json(&project, "app.ts@render");
    assert_eq!(json["kind"], "functions");
    assert_eq!(json["file_filter"], "app.ts");
    assert_eq!(json["symbol_filter"], "render");
    assert_eq!(json["force_reexecute"], false);
}

#[test]
fn classify_first_char_only_prefixes() {
    let project = TestProject::new();

    assert_eq!(classify_json(&project, "#Widget")["kind"], "workspace_symbols");
    assert_eq!(classify_json(&project, "a#b")["kind"], "files");
    assert_eq!(classify_json(&project, "?")["kind"], "help");
    assert_eq!(classify_json(&project, ":5")["force_reexecute"], true);
}

#[test]
fn classify_human_output_names_command() {
    let project = TestProject::new();

    Command::new(TestProject::bin())
        .args(["classify", "_"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("recent_files"))
        .stdout(predicate::str::contains("Delegates to:"));
}

#[test]
fn classify_disabled_prefix_falls_back_to_files() {
    let project = TestProject::new();
    project.write_file(".goto-anything/config.toml", "[prefixes]\nliterals = \"\"\n");

    let json = classify_json(&project, "readme!");
    assert_eq!(json["kind"], "files");
    assert_eq!(json["file_filter"], "readme!");
}
