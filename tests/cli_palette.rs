mod common;

use assert_cmd::Command;
use common::{sample_project, TestProject};
use predicates::prelude::*;
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

fn palette(project: &TestProject) -> Command {
    let mut cmd = Command::new(TestProject::bin());
    cmd.args(["--json", "palette", "--delay", "10"]).arg(project.path());
    cmd
}

fn events(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("palette output is not JSON lines"))
        .collect()
}

#[test]
fn palette_eof_dismisses() {
    let project = sample_project();

    let output = palette(&project).write_stdin("").output().unwrap();
    assert!(output.status.success());

    let events = events(&output.stdout);
    assert_eq!(events.first().unwrap()["event"], "show");
    assert_eq!(events.last().unwrap()["outcome"], "dismissed");
    assert!(events.iter().any(|e| e["event"] == "hide"));
}

#[test]
fn palette_quit_command_dismisses() {
    let project = sample_project();

    palette(&project)
        .write_stdin("\\quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"outcome":"dismissed"}"#));
}

#[test]
fn palette_dismiss_restores_active_file() {
    let project = sample_project();

    let output = palette(&project)
        .args(["--file", "src/app.ts"])
        .write_stdin("")
        .output()
        .unwrap();
    let events = events(&output.stdout);

    let restored = events
        .iter()
        .rev()
        .find(|e| e["event"] == "document")
        .expect("original document shown again");
    assert_eq!(restored["preview"], false);
    assert!(restored["file"].as_str().unwrap().ends_with("src/app.ts"));
}

#[test]
fn palette_accepts_highlighted_file() {
    let project = sample_project();

    let mut child = std::process::Command::new(TestProject::bin())
        .args(["--json", "palette", "--delay", "10", "--no-preview"])
        .arg(project.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    writeln!(stdin, "calc").unwrap();
    std::thread::sleep(Duration::from_millis(1000));
    writeln!(stdin).unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let events = events(&output.stdout);

    let opened = events
        .iter()
        .find(|e| e["event"] == "document")
        .expect("accepted file opened");
    assert_eq!(opened["preview"], false);
    assert!(opened["file"].as_str().unwrap().ends_with("src/calculator.rs"));

    let last = events.last().unwrap();
    assert_eq!(last["outcome"], "navigated");
    assert!(last["file"].as_str().unwrap().ends_with("src/calculator.rs"));
}
