// tests/grep_limit.rs — scenario 2 (spec.md §8): grep with a soft result cap.
mod common;

use pathkeeper::{FileSystem, FileSystemOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn grep_soft_cap_overshoot_is_bounded() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    for i in 0..100 {
        fs::write(dir.path().join(format!("f{i}.txt")), "line one\nline two TODO\nline three\n").unwrap();
    }

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    let max_results = 10;
    let hits = fs_handle.grep("TODO", "**/*.txt", false, max_results).unwrap();

    assert!(hits.len() >= max_results);
    let worker_count = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    assert!(hits.len() <= max_results + worker_count, "got {} hits, expected <= {}", hits.len(), max_results + worker_count);
}

#[test]
fn grep_zero_max_results_is_empty() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("f.txt"), "TODO\n").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    assert!(fs_handle.grep("TODO", "**/*.txt", false, 0).unwrap().is_empty());
}

#[test]
fn grep_is_case_insensitive_by_default() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("f.txt"), "say hello world\n").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    let hits = fs_handle.grep("HELLO", "**/*.txt", false, 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "say hello world");
}
