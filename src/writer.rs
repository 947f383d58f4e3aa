// writer.rs
use crate::error::FsResult;
use crate::windows::ensure_long_path_prefix;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write path for mutations against files beneath the index root.
///
/// Both operations are opaque to the Watcher: the OS events they
/// generate flow through the normal debounce path like any external
/// change. Neither synchronously updates the index.
pub struct Writer;

impl Writer {
    /// Atomically writes `content` to `path`: a sibling temp file in the
    /// target's directory is written, fsynced, then renamed onto the
    /// target. The rename is the commit point. Parent directories are
    /// created as needed. On failure at any step the temp file is
    /// removed by `NamedTempFile`'s own `Drop`.
    pub fn write_atomic(path: &Path, content: &str) -> FsResult<bool> {
        let path = ensure_long_path_prefix(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut temp = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;
        Ok(true)
    }

    /// Writes `content` to `path` with no temp file and no fsync:
    /// truncate, write, close. Documented as lossy on crash.
    pub fn write_fast(path: &Path, content: &str) -> FsResult<bool> {
        let path = ensure_long_path_prefix(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = File::create(&path)?;
        file.write_all(content.as_bytes())?;
        Ok(true)
    }
}
