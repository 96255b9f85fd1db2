//! Test utilities for building in-memory drives.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use crate::entry::{DirectoryEntry, Namespace};
use crate::remote::MemoryDirectoryService;

/// Entries of the reference drive:
///
/// ```text
/// root
/// ├── A/        (folder)
/// │   └── C     status=done
/// └── B
/// ```
pub fn sample_entries() -> Vec<DirectoryEntry> {
    vec![
        DirectoryEntry::folder("A", "A").with_parent("root"),
        DirectoryEntry::new("B", "B.txt", "text/plain").with_parent("root"),
        DirectoryEntry::new("C", "C.txt", "text/plain")
            .with_parent("A")
            .with_property(Namespace::Public, "status", "done"),
    ]
}

pub fn sample_drive() -> MemoryDirectoryService {
    MemoryDirectoryService::new(sample_entries())
}

/// A generated drive `depth` levels deep with `fanout` folders and `fanout`
/// files per folder.
pub fn generated_entries(depth: usize, fanout: usize) -> Vec<DirectoryEntry> {
    let mut entries = Vec::new();
    let mut level = vec!["root".to_string()];
    for d in 0..depth {
        let mut next = Vec::new();
        for parent in &level {
            for i in 0..fanout {
                let folder = format!("{parent}-d{d}f{i}");
                entries.push(DirectoryEntry::folder(&folder, &folder).with_parent(parent));
                entries.push(
                    DirectoryEntry::new(format!("{parent}-d{d}x{i}"), "file", "text/plain")
                        .with_parent(parent),
                );
                next.push(folder);
            }
        }
        level = next;
    }
    entries
}

/// Identifiers of `entries`, in order.
pub fn ids(entries: &[DirectoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

/// Write `entries` as a snapshot file understood by `MemoryDirectoryService`.
pub fn write_snapshot(dir: &Path, entries: &[DirectoryEntry]) -> PathBuf {
    let path = dir.join("snapshot.json");
    let json = serde_json::to_string_pretty(entries).expect("Failed to serialize snapshot");
    fs::write(&path, json).expect("Failed to write snapshot");
    path
}
