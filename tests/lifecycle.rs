// tests/lifecycle.rs — refresh idempotence, close semantics, metadata
// consistency after a write (spec.md §8 invariants).
mod common;

use pathkeeper::{FileSystem, FileSystemOptions, FsError};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn double_refresh_matches_single_refresh() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();

    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    fs_handle.refresh().unwrap();
    let once = fs_handle.list("**/*", true).unwrap();

    fs_handle.refresh().unwrap();
    fs_handle.refresh().unwrap();
    let twice = fs_handle.list("**/*", true).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn operations_after_close_fail_with_closed() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let fs_handle = FileSystem::open(dir.path(), FileSystemOptions::default()).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    fs_handle.close().unwrap();

    assert!(matches!(fs_handle.list("**/*", true), Err(FsError::Closed)));
    assert!(matches!(fs_handle.close(), Err(FsError::Closed)));
}

#[test]
fn metadata_reflects_a_completed_write() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("p"), "short").unwrap();

    let options = FileSystemOptions {
        auto_watch: true,
        debounce_window: Duration::from_millis(50),
        ..FileSystemOptions::default()
    };
    let fs_handle = FileSystem::open(dir.path(), options).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    fs_handle.write_file("p", "a much longer replacement body").unwrap();

    let deadline = Duration::from_millis(500);
    let poll_interval = Duration::from_millis(10);
    let mut waited = Duration::ZERO;
    let mut observed = 0u64;
    while waited < deadline {
        if let Ok(meta) = fs_handle.get_metadata("p") {
            observed = meta.size;
            if observed == "a much longer replacement body".len() as u64 {
                break;
            }
        }
        std::thread::sleep(poll_interval);
        waited += poll_interval;
    }

    assert_eq!(observed, "a much longer replacement body".len() as u64);
}

#[test]
fn invalid_root_is_rejected() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let not_a_dir = dir.path().join("missing");

    let err = FileSystem::open(&not_a_dir, FileSystemOptions::default()).unwrap_err();
    assert!(matches!(err, FsError::InvalidRoot(_)));
}
