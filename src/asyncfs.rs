// asyncfs.rs
//! Async façade over [`FileSystem`] (spec.md §10), behind the `async`
//! feature.
//!
//! Mirrors the reference implementation's `AsyncFileSystem`, which wraps
//! its synchronous backend in `asyncio.to_thread` rather than reimplementing
//! I/O on an async runtime: every method here is the same `spawn_blocking`
//! delegation, once per operation. There is no second code path to keep in
//! sync with the sync one — `FileSystem` is the only implementation.

use crate::entry::{FileMetadata, SearchResult};
use crate::error::FsResult;
use crate::options::FileSystemOptions;
use crate::FileSystem;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// `Arc`-wrapped handle so each `spawn_blocking` closure can hold its own
/// clone without borrowing past the async call's lifetime.
pub struct FileSystemAsync {
    inner: Arc<FileSystem>,
}

impl FileSystemAsync {
    pub async fn open(root: impl AsRef<Path>, options: FileSystemOptions) -> FsResult<Self> {
        let root = root.as_ref().to_path_buf();
        let fs = tokio::task::spawn_blocking(move || FileSystem::open(root, options))
            .await
            .expect("filesystem open task panicked")?;
        Ok(Self { inner: Arc::new(fs) })
    }

    pub async fn open_default(root: impl AsRef<Path>) -> FsResult<Self> {
        let root = root.as_ref().to_path_buf();
        let fs = tokio::task::spawn_blocking(move || FileSystem::open_default(root))
            .await
            .expect("filesystem open task panicked")?;
        Ok(Self { inner: Arc::new(fs) })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.wait_ready(timeout))
            .await
            .unwrap_or(false)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    pub fn is_watching(&self) -> bool {
        self.inner.is_watching()
    }

    pub async fn list(&self, pattern: String, only_files: bool) -> FsResult<Vec<String>> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.list(&pattern, only_files))
            .await
            .expect("list task panicked")
    }

    pub async fn glob(&self, pattern: String) -> FsResult<Vec<String>> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.glob(&pattern))
            .await
            .expect("glob task panicked")
    }

    pub async fn read_file(&self, path: String, encoding: String) -> FsResult<String> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.read_file(&path, &encoding))
            .await
            .expect("read_file task panicked")
    }

    pub async fn read_batch(&self, paths: Vec<String>) -> FsResult<HashMap<String, String>> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.read_batch(&paths))
            .await
            .expect("read_batch task panicked")
    }

    pub async fn read_lines(&self, path: String, start_line: usize, count: Option<usize>) -> FsResult<Vec<String>> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.read_lines(&path, start_line, count))
            .await
            .expect("read_lines task panicked")
    }

    pub async fn read_file_range(&self, path: String, offset: u64, limit: u64) -> FsResult<String> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.read_file_range(&path, offset, limit))
            .await
            .expect("read_file_range task panicked")
    }

    pub async fn write_file(&self, path: String, content: String) -> FsResult<bool> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.write_file(&path, &content))
            .await
            .expect("write_file task panicked")
    }

    pub async fn write_file_fast(&self, path: String, content: String) -> FsResult<bool> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.write_file_fast(&path, &content))
            .await
            .expect("write_file_fast task panicked")
    }

    pub async fn edit_replace(&self, path: String, old_text: String, new_text: String, strict: bool) -> FsResult<bool> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.edit_replace(&path, &old_text, &new_text, strict))
            .await
            .expect("edit_replace task panicked")
    }

    pub async fn grep(&self, query: String, glob_pattern: String, case_sensitive: bool, max_results: usize) -> FsResult<Vec<SearchResult>> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.grep(&query, &glob_pattern, case_sensitive, max_results))
            .await
            .expect("grep task panicked")
    }

    pub async fn get_metadata(&self, path: String) -> FsResult<FileMetadata> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.get_metadata(&path))
            .await
            .expect("get_metadata task panicked")
    }

    pub async fn refresh(&self) -> FsResult<()> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.refresh())
            .await
            .expect("refresh task panicked")
    }

    /// Synchronous, unlike every other method here: mirrors the reference
    /// implementation's `AsyncFileSystem.close()`, which stops the watcher
    /// thread directly rather than handing that teardown to the executor.
    pub fn close(&self) -> FsResult<()> {
        self.inner.close()
    }
}

