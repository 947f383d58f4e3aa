// tests/range_read.rs — scenario 6 (spec.md §8) plus the boundary
// behaviors for read_lines/read_file_range.
mod common;

use pathkeeper::{FileSystem, FileSystemOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn open_with(dir: &TempDir) -> FileSystem {
    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));
    fs_handle
}

#[test]
fn read_lines_returns_requested_window() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "a\nb\nc\nd\ne\n").unwrap();
    let fs_handle = open_with(&dir);

    assert_eq!(fs_handle.read_lines("p", 1, Some(2)).unwrap(), vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn read_file_range_returns_requested_bytes() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "a\nb\nc\nd\ne\n").unwrap();
    let fs_handle = open_with(&dir);

    assert_eq!(fs_handle.read_file_range("p", 2, 2).unwrap(), "b\n");
}

#[test]
fn read_lines_zero_count_is_always_empty() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "a\nb\nc\n").unwrap();
    let fs_handle = open_with(&dir);

    assert!(fs_handle.read_lines("p", 0, Some(0)).unwrap().is_empty());
    assert!(fs_handle.read_lines("p", 2, Some(0)).unwrap().is_empty());
}

#[test]
fn read_lines_past_end_is_empty() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "a\nb\n").unwrap();
    let fs_handle = open_with(&dir);

    assert!(fs_handle.read_lines("p", 10, Some(5)).unwrap().is_empty());
}

#[test]
fn read_file_range_past_end_is_empty_not_error() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "short").unwrap();
    let fs_handle = open_with(&dir);

    assert_eq!(fs_handle.read_file_range("p", 100, 10).unwrap(), "");
}

#[test]
fn read_lines_above_mmap_threshold_matches_below() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let content: String = (0..5000).map(|i| format!("line {i}\n")).collect();
    fs::write(dir.path().join("big.txt"), &content).unwrap();

    let options = FileSystemOptions {
        mmap_threshold_bytes: 1024,
        ..FileSystemOptions::default()
    };
    let fs_handle = FileSystem::open(dir.path(), options).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    let lines = fs_handle.read_lines("big.txt", 10, Some(3)).unwrap();
    assert_eq!(lines, vec!["line 10".to_string(), "line 11".to_string(), "line 12".to_string()]);
}
