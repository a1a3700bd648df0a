//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for writing docs, pointing a config at them, and
//! running the docci binary against it.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Returns the path to the docci binary.
///
/// Resolves relative to the test binary itself: the test executable lives at
/// target/debug/deps/specs-<hash>, so its grandparent is target/debug/ where
/// docci is built. Falls back to CARGO_MANIFEST_DIR for odd layouts.
fn docci_binary() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let candidate = debug_dir.join("docci");
            if candidate.exists() {
                return candidate;
            }
        }
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("target/debug/docci")
}

/// Run the docci binary with raw arguments.
pub fn docci(args: &[&str]) -> Output {
    Command::new(docci_binary())
        .args(args)
        .output()
        .expect("failed to run docci binary")
}

/// A scratch workspace holding docs and the files they mutate.
pub struct Scenario {
    pub dir: TempDir,
    docs: Vec<String>,
}

impl Scenario {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            docs: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a Markdown doc; docs run in the order they were added.
    pub fn doc(mut self, name: &str, content: &str) -> Self {
        std::fs::write(self.path().join(name), content).unwrap();
        self.docs.push(self.path().join(name).display().to_string());
        self
    }

    /// Write a plain file into the workspace.
    pub fn file(self, name: &str, content: &str) -> Self {
        std::fs::write(self.path().join(name), content).unwrap();
        self
    }

    /// The config JSON for this scenario: added docs as paths, workspace as
    /// working_dir, plus any extra top-level fields.
    pub fn config(&self, extra: &str) -> String {
        let paths: Vec<String> = self.docs.iter().map(|d| format!("\"{d}\"")).collect();
        format!(
            r#"{{"paths": [{}], "working_dir": "{}"{}}}"#,
            paths.join(", "),
            self.path().display(),
            extra
        )
    }

    /// Run docci with the scenario config passed as an inline JSON blob.
    pub fn run(&self) -> Output {
        docci(&[&self.config("")])
    }

    pub fn run_with(&self, extra: &str) -> Output {
        docci(&[&self.config(extra)])
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).unwrap()
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assert a zero exit, with context on failure.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success, got {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        stdout_of(output),
        stderr_of(output)
    );
}

/// Assert exit code 1, with context on failure.
pub fn assert_failure(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit 1\nstdout: {}\nstderr: {}",
        stdout_of(output),
        stderr_of(output)
    );
}
