#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace with sample source files for testing.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root, creating parent dirs as needed.
    pub fn write_file(&self, relative_path: &str, content: &str) {
        let full = self.dir.path().join(relative_path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        std::fs::write(&full, content).expect("failed to write file");
    }

    /// Write sample Rust source files.
    pub fn write_rust_fixtures(&self) {
        self.write_file(
            "src/calculator.rs",
            r#"//! A sample library for testing symbol search.

pub const MAX_VALUE: f64 = 1e9;

/// Adds two numbers together.
pub fn add(a: i32, b: i32) -> i32 {
    a + b
}

/// A simple calculator struct.
pub struct Calculator {
    pub value: f64,
}

impl Calculator {
    pub fn new() -> Self {
        Self { value: 0.0 }
    }

    pub fn multiply(&mut self, factor: f64) {
        self.value *= factor;
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
"#,
        );
    }

    /// Write a sample TypeScript module.
    pub fn write_typescript_fixtures(&self) {
        self.write_file(
            "src/app.ts",
            r#"export class App {
  constructor(private name: string) {}

  render(): string {
    return this.name;
  }
}

export function handleClick(callback: () => void) {
  callback();
}
"#,
        );
    }

    /// Write a markdown document with nested headings.
    pub fn write_markdown_fixtures(&self) {
        self.write_file(
            "docs/guide.md",
            "# Guide\n\nIntro.\n\n## Installation\n\nRun it.\n\n## Usage\n\nType a query.\n",
        );
    }

    /// Files that the default exclude rules or `.gitignore` should hide.
    pub fn write_excluded_fixtures(&self) {
        self.write_file("node_modules/left-pad/app.js", "module.exports = 1;\n");
        self.write_file("dist/app.bundle.js", "bundle();\n");
        self.write_file(".gitignore", "# build output\ndist/\n!keep.log\n");
    }

    /// Return the path to the binary under test (built via cargo).
    pub fn bin() -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_goto-anything"))
    }
}

/// A project with every fixture written.
pub fn sample_project() -> TestProject {
    let project = TestProject::new();
    project.write_rust_fixtures();
    project.write_typescript_fixtures();
    project.write_markdown_fixtures();
    project.write_excluded_fixtures();
    project
}
