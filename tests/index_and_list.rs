// tests/index_and_list.rs — scenario 1 (spec.md §8): index + list.
mod common;

use pathkeeper::{FileSystem, FileSystemOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn list_reflects_initial_scan() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/b.txt"), "b").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    let files = fs_handle.list("**/*", true).unwrap();
    assert_eq!(files, vec!["a.txt".to_string(), "sub/b.txt".to_string()]);
}

#[test]
fn only_files_is_subset_of_everything() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/b.txt"), "b").unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    let files_only = fs_handle.list("**/*", true).unwrap();
    let everything = fs_handle.list("**/*", false).unwrap();

    assert!(files_only.iter().all(|p| everything.contains(p)));
    assert!(everything.len() > files_only.len());
}
