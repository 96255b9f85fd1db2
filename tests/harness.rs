//! Test harness for drivetree integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use drivetree::DirectoryEntry;
use drivetree::test_utils::{sample_entries, write_snapshot};
use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory holding a drive snapshot.
pub struct TestDrive {
    dir: TempDir,
    snapshot: PathBuf,
}

impl TestDrive {
    pub fn new(entries: &[DirectoryEntry]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let snapshot = write_snapshot(dir.path(), entries);
        Self { dir, snapshot }
    }

    /// The reference drive: root holds folder A and file B, A holds file C.
    pub fn sample() -> Self {
        Self::new(&sample_entries())
    }

    /// A snapshot with file content, in the `{ "files", "content" }` layout.
    pub fn with_content(files: Value, content: Value) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let snapshot = dir.path().join("snapshot.json");
        let json = serde_json::json!({ "files": files, "content": content });
        fs::write(&snapshot, json.to_string()).expect("Failed to write snapshot");
        Self { dir, snapshot }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn snapshot(&self) -> &str {
        self.snapshot.to_str().expect("snapshot path is not UTF-8")
    }
}

pub fn run_drivetree(drive: &TestDrive, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_drivetree");
    let output = Command::new(binary)
        .arg("--snapshot")
        .arg(drive.snapshot())
        .args(args)
        .current_dir(drive.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run drivetree");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// Run and parse stdout as one JSON value.
pub fn run_json(drive: &TestDrive, args: &[&str]) -> Value {
    let (stdout, stderr, success) = run_drivetree(drive, args);
    assert!(success, "drivetree failed: {}", stderr);
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_writes_snapshot() {
        let drive = TestDrive::sample();
        assert!(Path::new(drive.snapshot()).exists());
    }
}
