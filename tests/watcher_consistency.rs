// tests/watcher_consistency.rs — scenario 5 (spec.md §8): an externally
// created file is visible within ~2x the debounce window, with no
// explicit refresh.
mod common;

use pathkeeper::{FileSystem, FileSystemOptions};
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn external_create_is_observed_without_refresh() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();

    let debounce = Duration::from_millis(50);
    let options = FileSystemOptions {
        auto_watch: true,
        debounce_window: debounce,
        ..FileSystemOptions::default()
    };
    let fs_handle = FileSystem::open(dir.path(), options).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));
    assert!(fs_handle.is_watching());

    fs::write(dir.path().join("new.txt"), "content").unwrap();

    let deadline = Duration::from_millis(50) + debounce * 4;
    let poll_interval = Duration::from_millis(10);
    let mut waited = Duration::ZERO;
    let mut seen = false;
    while waited < deadline {
        if fs_handle.list("**/*", true).unwrap().contains(&"new.txt".to_string()) {
            seen = true;
            break;
        }
        thread::sleep(poll_interval);
        waited += poll_interval;
    }

    assert!(seen, "watcher did not surface the new file within the expected window");
}

#[test]
fn watcher_applies_removal() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doomed.txt"), "content").unwrap();

    let debounce = Duration::from_millis(50);
    let options = FileSystemOptions {
        auto_watch: true,
        debounce_window: debounce,
        ..FileSystemOptions::default()
    };
    let fs_handle = FileSystem::open(dir.path(), options).unwrap();
    assert!(fs_handle.wait_ready(Duration::from_secs(5)));

    fs::remove_file(dir.path().join("doomed.txt")).unwrap();

    let deadline = Duration::from_millis(50) + debounce * 4;
    let poll_interval = Duration::from_millis(10);
    let mut waited = Duration::ZERO;
    let mut gone = false;
    while waited < deadline {
        if !fs_handle.list("**/*", true).unwrap().contains(&"doomed.txt".to_string()) {
            gone = true;
            break;
        }
        thread::sleep(poll_interval);
        waited += poll_interval;
    }

    assert!(gone, "watcher did not remove the deleted file within the expected window");
}
