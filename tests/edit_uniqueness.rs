// tests/edit_uniqueness.rs — scenario 4 (spec.md §8): strict/lenient
// unique-match replacement.
mod common;

use pathkeeper::{FileSystem, FileSystemOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn strict_mode_rejects_ambiguous_match() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "foo foo").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    let err = fs_handle.edit_replace("p", "foo", "bar", true).unwrap_err();
    assert!(matches!(err, pathkeeper::FsError::NotUnique { count: 2, .. }));
    assert_eq!(fs_handle.read_file("p", "utf-8").unwrap(), "foo foo");
}

#[test]
fn lenient_mode_replaces_first_occurrence() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "foo foo").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    assert!(fs_handle.edit_replace("p", "foo", "bar", false).unwrap());
    assert_eq!(fs_handle.read_file("p", "utf-8").unwrap(), "bar foo");
}

#[test]
fn no_op_replacement_is_idempotent() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "unique text here").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    assert!(fs_handle.edit_replace("p", "unique", "unique", true).unwrap());
    assert_eq!(fs_handle.read_file("p", "utf-8").unwrap(), "unique text here");
}

#[test]
fn strict_mode_rejects_missing_needle() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "nothing to see here").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    let err = fs_handle.edit_replace("p", "absent", "x", true).unwrap_err();
    assert!(matches!(err, pathkeeper::FsError::NotFoundStrict { .. }));
}

#[test]
fn lenient_mode_missing_needle_is_a_no_op() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "nothing to see here").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    assert!(!fs_handle.edit_replace("p", "absent", "x", false).unwrap());
    assert_eq!(fs_handle.read_file("p", "utf-8").unwrap(), "nothing to see here");
}
